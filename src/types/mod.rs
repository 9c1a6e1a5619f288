//! Data types shared by the cleaning and rewriting stages.

mod change_set;
mod outcome;

pub use change_set::*;
pub use outcome::*;
