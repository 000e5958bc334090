//! Small helpers shared across modules

pub mod comparison;

pub use comparison::{safe_float_cmp, sorted_copy, min_value, max_value};
