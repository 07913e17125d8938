//! Table formatting.

use super::{apply_font, apply_indents, apply_line_spacing, apply_spacing};
use crate::error::Result;
use crate::model::{Paragraph, Table};
use crate::requirements::{CellFormatting, Requirements};

/// Set table alignment and autofit, then format the first row as the header
/// and every other row as content. Cell paragraphs lose all indentation
/// and paragraph spacing.
pub fn format_table(table: &mut Table, requirements: &Requirements) -> Result<()> {
    let config = &requirements.tables;
    table.set_alignment(config.table.alignment);
    table.set_autofit(config.table.width_auto);

    for (index, row) in table.rows_mut().enumerate() {
        let cell_format = if index == 0 {
            &config.header
        } else {
            &config.content
        };
        for cell in row.cells_mut() {
            for paragraph in cell.paragraphs_mut() {
                format_cell_paragraph(paragraph, cell_format)?;
            }
        }
    }
    Ok(())
}

/// Format one paragraph inside a table cell.
pub fn format_cell_paragraph(paragraph: &mut Paragraph, config: &CellFormatting) -> Result<()> {
    if !paragraph.is_empty() {
        apply_font(
            paragraph,
            "tables.cell.font_size",
            &config.font_name,
            config.font_size,
            config.font_weight.is_bold(),
        )?;
    }
    paragraph.set_alignment(config.alignment);
    apply_indents(paragraph, "tables.cell.indent", 0.0, 0.0)?;
    apply_spacing(paragraph, "tables.cell.spacing", 0.0, 0.0)?;
    apply_line_spacing(paragraph, "tables.cell.line_spacing", config.line_spacing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Alignment, FontSize, Length};

    fn sample_table() -> Table {
        let mut table = Table::new(3, 2);
        for (r, row) in table.rows_mut().enumerate() {
            for (c, cell) in row.cells_mut().enumerate() {
                cell.set_text(&format!("{}-{}", r, c));
            }
        }
        table
    }

    #[test]
    fn test_header_and_content_rows() {
        let requirements = Requirements::default();
        let mut table = sample_table();

        format_table(&mut table, &requirements).unwrap();

        assert_eq!(table.alignment(), Some(Alignment::Center));
        assert!(table.autofit());

        let rows: Vec<_> = table.rows().collect();
        let header = rows[0].cells().next().unwrap().paragraphs().next().unwrap();
        assert_eq!(header.runs()[0].bold, Some(true));
        assert_eq!(header.runs()[0].size, Some(FontSize::from_half_points(24)));

        let content = rows[2].cells().next().unwrap().paragraphs().next().unwrap();
        assert_eq!(content.runs()[0].bold, None);
        assert_eq!(content.alignment(), Some(Alignment::Center));
        assert_eq!(
            content.indentation().first_line.map(Length::to_twips),
            Some(0)
        );
        assert_eq!(content.spacing().after.map(Length::to_twips), Some(0));
    }

    #[test]
    fn test_indented_cell_paragraph_is_cleared() {
        let requirements = Requirements::default();
        let mut table = sample_table();
        for row in table.rows_mut() {
            for cell in row.cells_mut() {
                for p in cell.paragraphs_mut() {
                    p.set_first_line_indent(Length::cm(1.25));
                    p.set_left_indent(Length::cm(2.0));
                }
            }
        }

        format_table(&mut table, &requirements).unwrap();

        for row in table.rows() {
            for cell in row.cells() {
                for p in cell.paragraphs() {
                    assert_eq!(p.indentation().left.map(Length::to_twips), Some(0));
                    assert_eq!(p.indentation().first_line.map(Length::to_twips), Some(0));
                }
            }
        }
    }

    #[test]
    fn test_format_table_is_idempotent() {
        let requirements = Requirements::default();
        let mut table = sample_table();
        format_table(&mut table, &requirements).unwrap();
        let once = table.clone();
        format_table(&mut table, &requirements).unwrap();
        assert_eq!(table, once);
    }

    #[test]
    fn test_empty_cell_gets_no_run() {
        let requirements = Requirements::default();
        let mut table = Table::new(1, 1);
        format_table(&mut table, &requirements).unwrap();
        let cell = table.rows().next().unwrap().cells().next().unwrap();
        assert_eq!(cell.paragraphs().next().map(|p| p.run_count()), Some(0));
    }
}
