//! Page sessions: navigation plus the data each page needs

pub mod session;
pub mod view;

pub use session::{Dispatched, Input, LoadRequest, Loaded, PendingLoad, Session};
pub use view::View;
