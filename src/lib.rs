//! Static file server that disables client-side caching.
//!
//! Files are served from a root directory (`./dist/` by default) on port
//! 8000, and every response leaves through [`middleware::NoCache`], which
//! appends `Cache-Control: no-cache, no-store, must-revalidate`,
//! `Pragma: no-cache` and `Expires: 0`.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod middleware;
pub mod server;
