//! Loading sensor exports into a [`Timeline`](timeline::Timeline).

pub mod datetime;
pub mod frame;
pub mod loader;
pub mod timeline;
