// Charge Admin - Library root for testing

pub mod auth;
pub mod config;
pub mod console;
pub mod error;
pub mod http_client;
pub mod models;
pub mod shell;
pub mod sync;
