pub mod annealer;
pub mod constraints;
pub mod moves;

pub use annealer::Annealer;
pub use constraints::{Constraint, ConstraintSet};
