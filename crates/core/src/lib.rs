//! Bistro Core - Shared types library.
//!
//! This crate provides the types used across all Bistro components:
//! - `client` - Page controller, submitters, HTTP transport
//! - `cli` - Terminal front-end driving the client against a live server
//!
//! # Architecture
//!
//! The core crate contains only types and pure state - no I/O, no HTTP
//! clients, no storage. This keeps it usable from any host, including a
//! browser build.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices and statuses
//! - [`cart`] - The cart store (line items, merge, remove, total)
//! - [`api`] - Request and response bodies for the customer API

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod types;

pub use cart::{Cart, CartError, LineItem, Quantity};
pub use types::*;
