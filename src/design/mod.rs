//! Design canvas page: tools, layered document, and JSON export.
//!
//! SYSTEM CONTEXT
//! ==============
//! The canvas page lets a user drop preset shapes onto a board, manage them in
//! a layers panel, and download the result. Rendering is the host's job; this
//! module owns only the document and the rules that drive the panel.

pub mod doc;
pub mod export;
pub mod tool;
