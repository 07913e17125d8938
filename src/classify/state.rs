//! Scan state over the document flow.

use serde::Serialize;

/// Region of the document the scanner is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanRegion {
    /// Title page, assignment sheet, calendar plan
    Title,
    /// Table of contents
    Contents,
    /// Body, possibly with the references sub-state
    Main,
}

/// Where the scanner believes it is: `TITLE -> CONTENTS -> MAIN`, with a
/// references flag that can only be raised in MAIN.
///
/// Both `found_main_content` and `in_references_section` only ever go from
/// false to true. Once MAIN is reached the scanner never returns to the
/// title or contents regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanState {
    in_title_section: bool,
    in_contents_section: bool,
    in_references_section: bool,
    found_main_content: bool,
    contents_seen: bool,
}

impl ScanState {
    /// A fresh state at the start of a document.
    pub fn new() -> Self {
        Self {
            in_title_section: true,
            in_contents_section: false,
            in_references_section: false,
            found_main_content: false,
            contents_seen: false,
        }
    }

    /// Enter the table of contents. Returns `false` if main content has
    /// already started.
    pub fn start_contents_section(&mut self) -> bool {
        if self.found_main_content {
            return false;
        }
        if !self.in_contents_section {
            log::info!("Entering table of contents");
        }
        self.in_title_section = false;
        self.in_contents_section = true;
        self.contents_seen = true;
        true
    }

    /// Enter the main body.
    pub fn start_main_content(&mut self) {
        if !self.found_main_content {
            log::info!("Main content starts");
        }
        self.in_title_section = false;
        self.in_contents_section = false;
        self.found_main_content = true;
    }

    /// Enter the bibliography. Returns `false` before main content.
    pub fn start_references_section(&mut self) -> bool {
        if !self.found_main_content {
            return false;
        }
        if !self.in_references_section {
            log::info!("Entering references section");
        }
        self.in_references_section = true;
        true
    }

    pub fn region(&self) -> ScanRegion {
        if self.found_main_content {
            ScanRegion::Main
        } else if self.in_contents_section {
            ScanRegion::Contents
        } else {
            ScanRegion::Title
        }
    }

    pub fn in_title_section(&self) -> bool {
        self.in_title_section
    }

    pub fn in_contents_section(&self) -> bool {
        self.in_contents_section
    }

    pub fn in_references_section(&self) -> bool {
        self.in_references_section
    }

    pub fn found_main_content(&self) -> bool {
        self.found_main_content
    }

    /// Check if a table of contents was entered at any point.
    pub fn contents_seen(&self) -> bool {
        self.contents_seen
    }

    /// Check if the scanner is in front matter (title or contents).
    pub fn in_front_matter(&self) -> bool {
        self.in_title_section || self.in_contents_section
    }
}

impl Default for ScanState {
    fn default() -> Self {
        Self::new()
    }
}
