//! Report assembly and printable output

pub mod assembler;
pub mod html;
pub mod i18n;
pub mod layout;

pub use assembler::{assemble, PageSize, ReportDocument, ReportOptions, Section};
pub use html::render_html;
