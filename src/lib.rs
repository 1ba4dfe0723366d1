pub mod auth;
pub mod common;
pub mod config;
pub mod database;
pub mod errors;
pub mod server;
pub mod services;
