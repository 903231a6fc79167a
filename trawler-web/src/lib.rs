//! Trawler Web - JSON API Server

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Pure JSON API server over the quality profile store. Provides RESTful
//! endpoints for frontend applications and external clients; no rendering
//! or templating lives here.

pub mod handlers;
pub mod server;

// Re-export main types
pub use server::{AppState, build_router, run_server, seed_demo_profiles};
