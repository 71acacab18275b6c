pub mod admin;
pub mod config;
pub mod console;
pub mod error;
pub mod http;
pub mod session;
pub mod token_store;
