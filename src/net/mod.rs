//! Networking modules for the backend REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` is the single chokepoint for backend calls, `transport` is the seam
//! between it and the HTTP stack, `error` normalizes failures, and `types`
//! defines the wire schema.

pub mod api;
pub mod error;
pub mod transport;
pub mod types;
