//! Table primitives shared by every rule file

pub mod range;

pub use range::{resolve_key, RangeKey, RangeTable};
