pub mod dashboard;
pub mod health;
pub mod size_charts;
pub mod storefront;
