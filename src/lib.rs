// Library exports for testing
pub mod auth;
pub mod authlog;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod session;
pub mod state;
