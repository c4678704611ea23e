//! Request handler module
//!
//! Routing dispatch plus one handler per endpoint: contact form, order
//! webhook, env check, and the site assets behind everything else.

mod assets;
mod contact;
mod env_check;
pub mod router;
mod webhook;

// Re-export main entry point
pub use router::handle_request;
