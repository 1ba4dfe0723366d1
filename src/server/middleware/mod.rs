pub mod session;
pub mod validation;

pub use validation::{Validate, ValidatedJson};
