//! Forward (autocomplete) and reverse geocoding.

pub mod api_client;
pub mod handlers;
