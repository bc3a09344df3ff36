//! Map-state core of the tax-credit dashboard.
//!
//! Stores own their state and mutate it only through their methods. The
//! [`Dashboard`] wires them together along the search → report → layers →
//! viewport flow and exposes the read-only [`RenderState`] contract.

pub mod basemap;
pub mod config;
pub mod dashboard;
pub mod lookup;
pub mod panel;
pub mod render;
pub mod report;
pub mod search;
pub mod viewport;

pub use basemap::*;
pub use config::*;
pub use dashboard::*;
pub use lookup::*;
pub use panel::*;
pub use render::*;
pub use report::*;
pub use search::*;
pub use viewport::*;
