//! Rendering module for writing outline documents.

mod json;

pub use json::{to_json, write_json, JsonFormat};
