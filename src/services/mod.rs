pub mod product_ref;
pub mod size_chart_service;
pub mod validation;

pub use product_ref::*;
pub use size_chart_service::*;
pub use validation::*;
