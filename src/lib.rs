pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod service;
pub mod store;
