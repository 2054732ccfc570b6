//! Runtime values and static type estimates.

mod type_estimate;
mod value;

pub use type_estimate::TypeEstimate;
pub use value::Value;
