pub mod cache;
pub mod config;
pub mod estimate;
pub mod generate;
