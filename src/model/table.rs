//! Table structure types.

use super::document::Block;
use super::paragraph::{Alignment, Paragraph};
use super::xml::{XmlElement, XmlNode, TBLPR_ORDER};

/// A `w:tbl` element, split into rows and the markup around them.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    attributes: Vec<(String, String)>,
    parts: Vec<TablePart>,
}

#[derive(Debug, Clone, PartialEq)]
enum TablePart {
    Row(TableRow),
    Other(XmlNode),
}

/// A `w:tr` element.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    attributes: Vec<(String, String)>,
    parts: Vec<RowPart>,
}

#[derive(Debug, Clone, PartialEq)]
enum RowPart {
    Cell(TableCell),
    Other(XmlNode),
}

/// A `w:tc` element. Cell content is a block sequence like the body.
#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    attributes: Vec<(String, String)>,
    /// Cell content (properties, paragraphs, nested tables)
    pub blocks: Vec<Block>,
}

impl Table {
    /// Create a `rows` x `cols` grid of empty cells.
    pub fn new(rows: usize, cols: usize) -> Self {
        let grid = (0..cols).fold(XmlElement::new("w:tblGrid"), |grid, _| {
            grid.with_child(XmlElement::new("w:gridCol").with_attr("w:w", "2000"))
        });
        let props = XmlElement::new("w:tblPr")
            .with_child(XmlElement::new("w:tblW").with_attr("w:w", "0").with_attr("w:type", "auto"));

        let mut parts = vec![
            TablePart::Other(XmlNode::Element(props)),
            TablePart::Other(XmlNode::Element(grid)),
        ];
        parts.extend((0..rows).map(|_| TablePart::Row(TableRow::new(cols))));

        Self {
            attributes: Vec::new(),
            parts,
        }
    }

    pub(crate) fn from_element(element: XmlElement) -> Self {
        let parts = element
            .children
            .into_iter()
            .map(|node| match node {
                XmlNode::Element(e) if e.name == "w:tr" => TablePart::Row(TableRow::from_element(e)),
                other => TablePart::Other(other),
            })
            .collect();
        Self {
            attributes: element.attributes,
            parts,
        }
    }

    pub(crate) fn into_element(self) -> XmlElement {
        XmlElement {
            name: "w:tbl".to_string(),
            attributes: self.attributes,
            children: self
                .parts
                .into_iter()
                .map(|part| match part {
                    TablePart::Row(row) => XmlNode::Element(row.into_element()),
                    TablePart::Other(node) => node,
                })
                .collect(),
        }
    }

    /// Rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &TableRow> {
        self.parts.iter().filter_map(|part| match part {
            TablePart::Row(row) => Some(row),
            TablePart::Other(_) => None,
        })
    }

    /// Rows in order, mutably.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut TableRow> {
        self.parts.iter_mut().filter_map(|part| match part {
            TablePart::Row(row) => Some(row),
            TablePart::Other(_) => None,
        })
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows().count()
    }

    /// Table alignment on the page.
    pub fn alignment(&self) -> Option<Alignment> {
        self.properties()
            .and_then(|p| p.child("w:jc"))
            .and_then(|jc| jc.attr("w:val"))
            .and_then(Alignment::from_jc)
    }

    /// Set table alignment on the page.
    pub fn set_alignment(&mut self, alignment: Alignment) {
        let value = match alignment {
            // Justification has no meaning for a table row; treat as left.
            Alignment::Justify => Alignment::Left.as_jc(),
            other => other.as_jc(),
        };
        self.properties_mut()
            .ensure_child("w:jc", TBLPR_ORDER)
            .set_attr("w:val", value);
    }

    /// Check if column widths adapt to content.
    pub fn autofit(&self) -> bool {
        self.properties()
            .and_then(|p| p.child("w:tblLayout"))
            .and_then(|l| l.attr("w:type"))
            != Some("fixed")
    }

    /// Switch between autofit and fixed column widths.
    pub fn set_autofit(&mut self, autofit: bool) {
        let layout = if autofit { "autofit" } else { "fixed" };
        self.properties_mut()
            .ensure_child("w:tblLayout", TBLPR_ORDER)
            .set_attr("w:type", layout);
    }

    /// Text of every cell, row by row.
    pub fn cell_texts(&self) -> Vec<Vec<String>> {
        self.rows()
            .map(|row| row.cells().map(TableCell::text).collect())
            .collect()
    }

    fn properties(&self) -> Option<&XmlElement> {
        self.parts.iter().find_map(|part| match part {
            TablePart::Other(XmlNode::Element(e)) if e.name == "w:tblPr" => Some(e),
            _ => None,
        })
    }

    fn properties_mut(&mut self) -> &mut XmlElement {
        let index = match self
            .parts
            .iter()
            .position(|part| matches!(part, TablePart::Other(node) if node.is_element("w:tblPr")))
        {
            Some(index) => index,
            None => {
                self.parts.insert(
                    0,
                    TablePart::Other(XmlNode::Element(XmlElement::new("w:tblPr"))),
                );
                0
            }
        };
        match &mut self.parts[index] {
            TablePart::Other(XmlNode::Element(e)) => e,
            _ => unreachable!("tblPr was located as an element"),
        }
    }
}

impl TableRow {
    fn new(cols: usize) -> Self {
        Self {
            attributes: Vec::new(),
            parts: (0..cols).map(|_| RowPart::Cell(TableCell::new())).collect(),
        }
    }

    fn from_element(element: XmlElement) -> Self {
        let parts = element
            .children
            .into_iter()
            .map(|node| match node {
                XmlNode::Element(e) if e.name == "w:tc" => RowPart::Cell(TableCell::from_element(e)),
                other => RowPart::Other(other),
            })
            .collect();
        Self {
            attributes: element.attributes,
            parts,
        }
    }

    fn into_element(self) -> XmlElement {
        XmlElement {
            name: "w:tr".to_string(),
            attributes: self.attributes,
            children: self
                .parts
                .into_iter()
                .map(|part| match part {
                    RowPart::Cell(cell) => XmlNode::Element(cell.into_element()),
                    RowPart::Other(node) => node,
                })
                .collect(),
        }
    }

    /// Cells in order.
    pub fn cells(&self) -> impl Iterator<Item = &TableCell> {
        self.parts.iter().filter_map(|part| match part {
            RowPart::Cell(cell) => Some(cell),
            RowPart::Other(_) => None,
        })
    }

    /// Cells in order, mutably.
    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut TableCell> {
        self.parts.iter_mut().filter_map(|part| match part {
            RowPart::Cell(cell) => Some(cell),
            RowPart::Other(_) => None,
        })
    }
}

impl TableCell {
    fn new() -> Self {
        // A cell must hold at least one paragraph.
        Self {
            attributes: Vec::new(),
            blocks: vec![Block::Paragraph(Paragraph::new())],
        }
    }

    fn from_element(element: XmlElement) -> Self {
        Self {
            attributes: element.attributes,
            blocks: element.children.into_iter().map(Block::from_node).collect(),
        }
    }

    fn into_element(self) -> XmlElement {
        XmlElement {
            name: "w:tc".to_string(),
            attributes: self.attributes,
            children: self.blocks.into_iter().map(Block::into_node).collect(),
        }
    }

    /// Paragraphs directly in the cell.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    /// Paragraphs directly in the cell, mutably.
    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.blocks.iter_mut().filter_map(|block| match block {
            Block::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    /// Replace the cell text with a single paragraph.
    pub fn set_text(&mut self, text: &str) {
        self.blocks.retain(|block| !matches!(block, Block::Paragraph(_)));
        self.blocks.push(Block::Paragraph(Paragraph::with_text(text)));
    }

    /// Cell text, paragraphs joined by newlines.
    pub fn text(&self) -> String {
        self.paragraphs()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
