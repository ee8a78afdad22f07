//! mediclerk-export
//!
//! Printable clerking notes: a Tera template renders the record to a small
//! Markdown subset, which is then packed into DOCX.

pub mod docx;
pub mod error;
pub mod render;
pub mod styles;
