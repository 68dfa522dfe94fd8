pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod interfaces;
pub mod observability;
pub mod settlement;
pub mod store;
pub mod types;
pub mod utils;
