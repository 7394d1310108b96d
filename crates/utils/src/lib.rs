//! Common utility for extended `std` types
//!
//! These are left public for convenience.
//!
//! For example, consistent scientific formatting of axis bounds and primaries
//! in every summary printed by the `mctools` crates.

// Alias for the format! macro
pub use std::format as f;

// Modules
mod option_ext;
mod value_ext;

// Flatten
pub use option_ext::OptionExt;
pub use value_ext::ValueExt;
