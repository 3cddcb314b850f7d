//! Client core for the Onlearn course marketplace.
//!
//! The crate owns everything between the presentation layer and the backend
//! API: typed HTTP calls, the authenticated-session context, and a keyed query
//! cache that deduplicates and retries reads. Views (or the bundled CLI) talk
//! to [`app::App`], which wires one instance of each piece together.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Environment-driven client configuration |
//! | [`net`] | Wire types, error taxonomy, transport seam and [`net::api::ApiClient`] |
//! | [`query`] | Query keys, retry policy and the [`query::cache::QueryCache`] |
//! | [`state`] | Session context and late-response scoping |
//! | [`services`] | Catalog, learning and community operations bound to the cache |
//! | [`design`] | Document model behind the design canvas page |
//! | [`app`] | Explicitly constructed application handle |

pub mod app;
pub mod config;
pub mod design;
pub mod net;
pub mod query;
pub mod services;
pub mod state;

#[cfg(test)]
pub(crate) mod test_helpers;
