//! Keyed request cache shared by every data-bound view.
//!
//! SYSTEM CONTEXT
//! ==============
//! `key` names resources, `retry` decides when a failed read is attempted
//! again, and `cache` stores results, collapses concurrent reads of the same
//! key into one request, and notifies subscribers when entries change.

pub mod cache;
pub mod key;
pub mod retry;
