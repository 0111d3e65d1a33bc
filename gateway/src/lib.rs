pub mod auth;
pub mod config;
pub mod location;
pub mod openapi;
pub mod routes;
pub mod weather;
