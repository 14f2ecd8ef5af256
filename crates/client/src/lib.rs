//! Bistro Client - ordering page controller.
//!
//! Drives the restaurant's ordering page: the menu's Add controls, the cart
//! and its summary panel, the order / private-room / event forms, and the
//! round trip through the login page when the server asks for a session.
//!
//! # Architecture
//!
//! The page talks to its surroundings only through traits:
//! - [`transport::Transport`] - JSON requests to the customer API
//! - [`storage::SessionStorage`] - per-tab key/value storage
//! - [`platform::Navigator`] / [`platform::Notifier`] - location and alerts
//!
//! A browser host implements these over the DOM; the CLI uses
//! [`transport::HttpTransport`], [`storage::FileSessionStorage`] and the
//! recording collaborators.
//!
//! # Modules
//!
//! - [`page`] - [`page::OrderPage`], the handlers behind every control
//! - [`submit`] - Submit state machine shared by the three forms
//! - [`resume`] - Redirect-to-login and resume-after-login
//! - [`summary`] - Order summary rendering (askama)
//! - [`history`] - Customer order and booking history

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod forms;
pub mod history;
pub mod menu;
pub mod page;
pub mod platform;
pub mod resume;
pub mod storage;
pub mod submit;
pub mod summary;
pub mod transport;

pub use config::ClientConfig;
pub use page::{OrderPage, PageError};
pub use submit::{FormKind, SubmitOutcome};
