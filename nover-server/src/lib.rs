//! nover-server: HTTP API for the Nover serialized-fiction platform

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod token;
