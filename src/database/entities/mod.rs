pub mod products;
pub mod size_charts;
