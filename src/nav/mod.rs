//! Hash-driven navigation
//!
//! - `route`: pure hash grammar (`decode` / `encode`)
//! - `page`: page identity
//! - `state`: the navigation store and its events
//! - `back`: back-navigation dispatch
//! - `fetch`: stale-load guard

pub mod back;
pub mod fetch;
pub mod page;
pub mod route;
pub mod state;

pub use fetch::{LatestFetch, Ticket};
pub use page::Page;
pub use route::{decode, encode, AllSpacesFilters, Route, SearchParams};
pub use state::{Effect, NavEvent, NavigationState, Navigator, Transition};
