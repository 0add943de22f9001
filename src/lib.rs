pub mod api;
pub mod config;
pub mod generator;
pub mod risk;
pub mod store;
