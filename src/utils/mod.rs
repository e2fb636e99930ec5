mod maths_utils;
mod perf;

pub use maths_utils::{round_to_decimals, value_min_max};
