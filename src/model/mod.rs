//! Document model types for WordprocessingML content.
//!
//! The model keeps the XML of every part it touches so that formatting
//! changes are written back without losing markup it does not understand.
//! Body content is split into paragraphs and tables; everything else stays
//! as raw nodes.

mod document;
mod package;
mod paragraph;
mod run;
mod section;
mod styles;
mod table;
mod units;
pub mod xml;

pub use document::{Block, Document};
pub use package::Package;
pub use paragraph::{Alignment, Indentation, Paragraph, Spacing};
pub use run::{Run, RunFormat};
pub use section::{PageMargins, Section};
pub use styles::StyleSheet;
pub use table::{Table, TableCell, TableRow};
pub use units::{FontSize, Length};
pub use xml::{XmlElement, XmlNode};
