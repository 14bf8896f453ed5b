pub mod auth;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod types;
