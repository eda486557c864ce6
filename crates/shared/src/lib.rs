pub mod config;
pub mod label;
pub mod probability;
pub mod result;
