//! Response middleware applied around the request handler

pub mod no_cache;

pub use no_cache::{apply_no_cache_headers, NoCache};
