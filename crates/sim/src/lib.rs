pub mod dataset;
pub mod detector;
pub mod engine;
pub mod generator;
pub mod runner;
