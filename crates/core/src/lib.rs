//! Bakehouse Core - Shared types library.
//!
//! This crate provides the domain types shared between the storefront
//! library and any tooling built on top of it.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! hosted-service access. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and
//!   order/role statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
