//! Export Coles shopping lists with current prices.
//!
//! The pipeline reads the subscription key and page context from a shopping
//! list page ([`page`]), fetches and normalizes the lists ([`api`]), prices
//! every item one request at a time ([`export`]) and renders a printable
//! document with an email link ([`render`]). [`visibility`] decides where the
//! export control is shown as the user navigates.

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod control;
pub mod error;
pub mod export;
pub mod page;
pub mod render;
pub mod visibility;

pub use error::{ColesListsError, Result};
