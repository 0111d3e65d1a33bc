//! Current conditions by city and forecast bundles by coordinates.

pub mod api_client;
pub mod handlers;
