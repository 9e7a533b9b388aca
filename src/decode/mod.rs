// src/decode/mod.rs
// =============================================================================
// This module turns a fetched file into the lines we print.
//
// Submodules:
// - payload: undoes the API's transport encoding (base64)
// - lines: trims lines and drops blanks and comments
// =============================================================================

mod lines;
mod payload;

pub use lines::meaningful_lines;
pub use payload::decode_payload;
