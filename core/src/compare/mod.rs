//! Product comparison: magnitude extraction, diffing and the selection pair.

pub mod evaluator;
pub mod magnitude;
pub mod selection;

pub use evaluator::{
    better_of, build_rows, count_differences, evaluate, filter_differences_only, loose_equal,
    meter_width_percent, ComparisonRow, ComparisonView, Winner,
};
pub use magnitude::extract_magnitude;
pub use selection::{Selectable, SelectionPair, Toggle};
