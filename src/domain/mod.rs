pub mod models;
pub mod risk;
pub mod scoring;
pub mod wizard;
