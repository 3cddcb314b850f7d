//! Client-side state shared across views.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth` owns the single answer to "who is logged in"; `scope` lets a
//! short-lived consumer drop responses that arrive after it went away.

pub mod auth;
pub mod scope;
