//! Storefront Core - Shared types library.
//!
//! This crate provides the domain types shared by the storefront binary and
//! its tests:
//! - Identifiers issued by the commerce backend (orders, customers, line items)
//! - Money values that the backend has already formatted for display
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Everything
//! here is plain data that can be serialized into a session or a template.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for backend IDs and formatted money

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
