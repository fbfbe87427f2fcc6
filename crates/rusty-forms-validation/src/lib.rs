//! rusty-forms validation predicates
//!
//! Pure functions backing the preset rules of the `rusty-forms` registry.
//! Each function answers one question about an already-provided value;
//! absence handling belongs to the caller.

pub mod email;
pub mod numeric;
pub mod string;

// Re-export all validators
pub use email::*;
pub use numeric::*;
pub use string::*;
