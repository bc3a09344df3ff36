pub mod client;
pub mod layer;
pub mod store;
pub mod symbology;
pub mod vector;

pub use client::*;
pub use layer::*;
pub use store::*;
pub use vector::LayerDescriptor;
