//! Page sections (`w:sectPr`).

use super::units::Length;
use super::xml::{XmlElement, SECTPR_ORDER};
use serde::{Deserialize, Serialize};

/// Page margins of one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageMargins {
    /// Top margin
    pub top: Length,
    /// Bottom margin
    pub bottom: Length,
    /// Left margin
    pub left: Length,
    /// Right margin
    pub right: Length,
}

impl PageMargins {
    /// Margins from centimetre values.
    pub fn from_cm(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top: Length::cm(top),
            bottom: Length::cm(bottom),
            left: Length::cm(left),
            right: Length::cm(right),
        }
    }
}

/// Mutable view of a section's properties.
#[derive(Debug)]
pub struct Section<'a> {
    element: &'a mut XmlElement,
}

impl<'a> Section<'a> {
    pub(crate) fn new(element: &'a mut XmlElement) -> Self {
        Self { element }
    }

    /// Current page margins. Missing values read as zero.
    pub fn margins(&self) -> PageMargins {
        read_margins(self.element)
    }

    /// Set all four page margins. Header, footer and gutter distances are
    /// kept, or given Word's defaults when the section had none.
    pub fn set_margins(&mut self, margins: PageMargins) {
        let pg_mar = self.element.ensure_child("w:pgMar", SECTPR_ORDER);
        pg_mar.set_attr("w:top", margins.top.to_twips().to_string());
        pg_mar.set_attr("w:right", margins.right.to_twips().to_string());
        pg_mar.set_attr("w:bottom", margins.bottom.to_twips().to_string());
        pg_mar.set_attr("w:left", margins.left.to_twips().to_string());
        for (key, default) in [("w:header", "708"), ("w:footer", "708"), ("w:gutter", "0")] {
            if pg_mar.attr(key).is_none() {
                pg_mar.set_attr(key, default);
            }
        }
    }
}

pub(crate) fn read_margins(section: &XmlElement) -> PageMargins {
    let Some(pg_mar) = section.child("w:pgMar") else {
        return PageMargins::default();
    };
    let twips = |key: &str| {
        pg_mar
            .attr(key)
            .and_then(|v| v.parse::<i64>().ok())
            .map(Length::twips)
            .unwrap_or_default()
    };
    PageMargins {
        top: twips("w:top"),
        bottom: twips("w:bottom"),
        left: twips("w:left"),
        right: twips("w:right"),
    }
}

/// Section properties for an A4 portrait page with Word's default margins.
pub(crate) fn default_section() -> XmlElement {
    XmlElement::new("w:sectPr")
        .with_child(
            XmlElement::new("w:pgSz")
                .with_attr("w:w", "11906")
                .with_attr("w:h", "16838"),
        )
        .with_child(
            XmlElement::new("w:pgMar")
                .with_attr("w:top", "1134")
                .with_attr("w:right", "850")
                .with_attr("w:bottom", "1134")
                .with_attr("w:left", "1701")
                .with_attr("w:header", "708")
                .with_attr("w:footer", "708")
                .with_attr("w:gutter", "0"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::xml::XmlNode;

    #[test]
    fn test_default_section_margins() {
        let section = default_section();
        let margins = read_margins(&section);
        assert_eq!(margins.top.to_twips(), 1134);
        assert!((margins.left.to_cm() - 3.0).abs() < 0.01);
    }

    #[test]
    fn test_set_margins_round_trip() {
        let mut element = XmlElement::new("w:sectPr");
        let mut section = Section::new(&mut element);
        section.set_margins(PageMargins::from_cm(2.0, 2.0, 3.0, 1.5));

        let margins = section.margins();
        assert!((margins.top.to_cm() - 2.0).abs() < 0.01);
        assert!((margins.bottom.to_cm() - 2.0).abs() < 0.01);
        assert!((margins.left.to_cm() - 3.0).abs() < 0.01);
        assert!((margins.right.to_cm() - 1.5).abs() < 0.01);

        let pg_mar = element.child("w:pgMar").unwrap();
        assert_eq!(pg_mar.attr("w:gutter"), Some("0"));
    }

    #[test]
    fn test_set_margins_keeps_order() {
        let mut element = default_section();
        element.children.remove(1);
        element
            .children
            .push(XmlNode::Element(XmlElement::new("w:cols")));
        Section::new(&mut element).set_margins(PageMargins::from_cm(1.0, 1.0, 1.0, 1.0));
        let names: Vec<&str> = element.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["w:pgSz", "w:pgMar", "w:cols"]);
    }
}
