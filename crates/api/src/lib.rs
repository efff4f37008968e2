//! Mindnest API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes) so the
//! binary entrypoint and the integration tests share one router.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
