// src/candidates/handlers/mod.rs

pub mod imports;
pub mod listing;
pub mod resumes;

// Re-export handler functions
pub use imports::*;
pub use listing::*;
pub use resumes::*;
