pub mod extract;
pub mod feature;

pub use extract::*;
pub use feature::*;
