//! Server side of the Brooklin Pub website
//!
//! Contact-form email relay, order-webhook acknowledgement, mail settings
//! check, and the built single-page app served through a service-worker
//! style asset cache.

pub mod asset_cache;
pub mod config;
pub mod contact;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
