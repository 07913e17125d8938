//! Formatting rules applied to classified paragraphs and tables.
//!
//! Every operation is idempotent: applying it to an already formatted
//! paragraph leaves font, alignment, indentation and spacing unchanged.
//! Text is only ever changed by the upper-case transform of headings.

mod global;
mod paragraph;
mod table;

pub use global::{apply_base_font, apply_global_settings, apply_margins};
pub use paragraph::{PageBreakMode, ParagraphFormatter};
pub use table::{format_cell_paragraph, format_table};

use crate::error::{Error, Result};
use crate::model::{FontSize, Length, Paragraph};

/// Set font name and size on every run, adding an empty run to a
/// paragraph that has none. Bold is only ever switched on.
pub(crate) fn apply_font(
    paragraph: &mut Paragraph,
    field: &'static str,
    name: &str,
    size_pt: f64,
    bold: bool,
) -> Result<()> {
    let size = FontSize::try_from_pt(field, size_pt)?;
    paragraph.ensure_run();
    for mut run in paragraph.runs_mut() {
        run.set_font_name(name);
        run.set_size(size);
        if bold {
            run.set_bold(true);
        }
    }
    Ok(())
}

pub(crate) fn apply_spacing(
    paragraph: &mut Paragraph,
    field: &'static str,
    before_pt: f64,
    after_pt: f64,
) -> Result<()> {
    let before = Length::try_pt(field, before_pt)?;
    let after = Length::try_pt(field, after_pt)?;
    paragraph.set_space_before(before);
    paragraph.set_space_after(after);
    Ok(())
}

pub(crate) fn apply_line_spacing(
    paragraph: &mut Paragraph,
    field: &'static str,
    multiple: f64,
) -> Result<()> {
    if !multiple.is_finite() || multiple <= 0.0 {
        return Err(Error::invalid_value(field, multiple));
    }
    paragraph.set_line_spacing(multiple);
    Ok(())
}

/// Set first-line and left indents and clear the right indent.
pub(crate) fn apply_indents(
    paragraph: &mut Paragraph,
    field: &'static str,
    first_line_cm: f64,
    left_cm: f64,
) -> Result<()> {
    let first_line = Length::try_cm(field, first_line_cm)?;
    let left = Length::try_cm(field, left_cm)?;
    paragraph.set_first_line_indent(first_line);
    paragraph.set_left_indent(left);
    paragraph.set_right_indent(Length::ZERO);
    Ok(())
}
