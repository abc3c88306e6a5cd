//! Leasehub - leasing catalog for commercial office buildings
//!
//! Buildings and units behind one [`catalog::CatalogSource`] trait, a
//! filter/sort/page pipeline over units, a URL-hash navigation store with
//! back-navigation rules, and an axum JSON API tying them together.

pub mod app;
pub mod cache;
pub mod catalog;
pub mod cli;
pub mod core;
pub mod nav;
pub mod output;
pub mod search;
pub mod web;

pub use core::config::Config;
pub use core::error::{Error, Result};
