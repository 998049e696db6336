//! Rancher v1 API surface: the trait seam, wire types, and the HTTP client.

pub mod api;
pub mod client;
pub mod types;
