//! DOCX format detection and validation.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Container information gathered from the file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocxFormat {
    /// Zip "version needed to extract" of the first local entry (e.g. 20 for 2.0)
    pub zip_version: u16,
}

impl std::fmt::Display for DocxFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DOCX (zip {}.{})",
            self.zip_version / 10,
            self.zip_version % 10
        )
    }
}

/// Zip local file header magic: PK\x03\x04
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const HEADER_LEN: usize = 6;

/// Detect DOCX format from a file path.
///
/// Only the container header is checked; missing parts are reported when
/// the package is opened.
///
/// # Example
/// ```no_run
/// use vkrfmt::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("thesis.docx").unwrap();
/// println!("{}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<DocxFormat> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = [0u8; HEADER_LEN];
    reader
        .read_exact(&mut header)
        .map_err(|_| Error::UnknownFormat)?;
    detect_format_from_bytes(&header)
}

/// Detect DOCX format from bytes.
///
/// # Returns
/// * `Ok(DocxFormat)` if the data starts with a zip local file header
/// * `Err(Error::UnknownFormat)` otherwise
pub fn detect_format_from_bytes(data: &[u8]) -> Result<DocxFormat> {
    if data.len() < HEADER_LEN || !data.starts_with(ZIP_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let zip_version = u16::from_le_bytes([data[4], data[5]]);
    Ok(DocxFormat { zip_version })
}

/// Check if a file looks like a DOCX package.
pub fn is_docx<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

/// Check if bytes look like a DOCX package.
pub fn is_docx_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_zip_header() {
        let data = b"PK\x03\x04\x14\x00\x06\x00";
        let format = detect_format_from_bytes(data).unwrap();
        assert_eq!(format.zip_version, 20);
        assert_eq!(format.to_string(), "DOCX (zip 2.0)");
    }

    #[test]
    fn test_detect_invalid_format() {
        let data = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3";
        let result = detect_format_from_bytes(data);
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_detect_too_short() {
        assert!(matches!(
            detect_format_from_bytes(b"PK"),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_is_docx_bytes() {
        assert!(is_docx_bytes(b"PK\x03\x04\x14\x00"));
        assert!(!is_docx_bytes(b"{\\rtf1"));
    }

    #[test]
    fn test_is_docx_missing_file() {
        assert!(!is_docx("/nonexistent/thesis.docx"));
    }
}
