// src/parsing/mod.rs
//! Resume parsing: document-to-text conversion plus heuristic field extraction

pub mod document;
pub mod fields;

pub use document::{extract_text, DocumentError};
pub use fields::{extract_fields, ResumeFields};
