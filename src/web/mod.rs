//! Leasehub Web - JSON API
//!
//! Public catalog and search endpoints, the scheduling form, hash decoding,
//! the bearer-guarded admin API and an SSE change stream.

pub mod admin;
pub mod error;
pub mod events;
pub mod server;

pub use server::{router, run, AppState};
