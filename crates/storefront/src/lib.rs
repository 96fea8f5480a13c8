//! Bakehouse Storefront core library.
//!
//! The state containers and hosted-service gateways behind the Bakehouse
//! shop app: the app shell binds its screens to this crate and delegates
//! identity, catalog storage, image storage, and payment capture to
//! hosted services over HTTP.
//!
//! # Architecture
//!
//! - Domain types live in [`bakehouse_core`] and [`models`]
//! - Hosted services are reached through thin `reqwest` clients
//!   ([`docstore`], [`identity`], [`media`], [`payment`])
//! - The cart is an explicit state container ([`cart`]) persisted to
//!   durable local storage on every mutation
//! - Checkout is a linear fail-fast sequence ([`checkout`]) over the
//!   payment gateway and the order collection
//! - Every hosted dependency sits behind a trait so tests substitute
//!   in-memory fakes

#![cfg_attr(not(test), forbid(unsafe_code))]
// Service traits use async fn; the app shell is single-threaded and never
// needs Send futures.
#![allow(async_fn_in_trait)]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod db;
pub mod docstore;
pub mod error;
pub mod identity;
pub mod media;
pub mod models;
pub mod payment;
pub mod router;
pub mod state;
pub mod telemetry;

pub use error::{AppError, Result};
