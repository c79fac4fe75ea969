pub mod browse;
pub mod export;
pub mod visualize;
