//! Document-wide settings: page margins and the default font.

use crate::error::Result;
use crate::model::{Document, FontSize, Length, PageMargins};
use crate::requirements::{BaseFormatting, MarginsCm, Requirements};

/// Apply margins and the base font. Both are attempted; the first error
/// is returned.
pub fn apply_global_settings(document: &mut Document, requirements: &Requirements) -> Result<()> {
    let base = &requirements.base_formatting;
    let margins = apply_margins(document, &base.margins_cm);
    let font = apply_base_font(document, base);
    margins.map(|sections| {
        log::info!("Margins applied to {} section(s)", sections);
    })?;
    font
}

/// Set the margins of every section. Returns the number of sections.
pub fn apply_margins(document: &mut Document, margins: &MarginsCm) -> Result<usize> {
    let margins = PageMargins {
        top: Length::try_cm("margins_cm.top", margins.top)?,
        bottom: Length::try_cm("margins_cm.bottom", margins.bottom)?,
        left: Length::try_cm("margins_cm.left", margins.left)?,
        right: Length::try_cm("margins_cm.right", margins.right)?,
    };
    let mut sections = document.sections_mut();
    for section in sections.iter_mut() {
        section.set_margins(margins);
    }
    Ok(sections.len())
}

/// Set the document default font and the default paragraph style font.
pub fn apply_base_font(document: &mut Document, base: &BaseFormatting) -> Result<()> {
    let size = FontSize::try_from_pt("base_formatting.font_size", base.font_size)?;
    document.styles_mut().set_default_font(&base.font_name, size);
    log::info!("Base font: {} {}pt", base.font_name, size.to_pt());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_margins_round_trip() {
        let mut document = Document::new();
        let requirements = Requirements::default();

        apply_global_settings(&mut document, &requirements).unwrap();

        let margins = document.page_margins();
        assert_eq!(margins.len(), 1);
        let m = margins[0];
        assert!((m.top.to_cm() - 2.0).abs() < 0.01);
        assert!((m.bottom.to_cm() - 2.0).abs() < 0.01);
        assert!((m.left.to_cm() - 3.0).abs() < 0.01);
        assert!((m.right.to_cm() - 1.5).abs() < 0.01);
    }

    #[test]
    fn test_base_font() {
        let mut document = Document::new();
        let mut requirements = Requirements::default();
        requirements.base_formatting.font_size = 12.0;

        apply_global_settings(&mut document, &requirements).unwrap();

        let (name, size) = document.styles().default_font();
        assert_eq!(name.as_deref(), Some("Times New Roman"));
        assert_eq!(size, Some(FontSize::from_half_points(24)));
    }

    #[test]
    fn test_bad_margin_still_sets_font() {
        let mut document = Document::new();
        let mut requirements = Requirements::default();
        requirements.base_formatting.margins_cm.left = f64::INFINITY;

        let err = apply_global_settings(&mut document, &requirements).unwrap_err();

        assert!(matches!(err, Error::InvalidValue { .. }));
        assert_eq!(
            document.styles().default_font().0.as_deref(),
            Some("Times New Roman")
        );
    }
}
