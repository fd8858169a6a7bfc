//! HTTP middleware for the API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, one transaction per request)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. `RequireApiToken` extractor on every board route

pub mod auth;

pub use auth::RequireApiToken;
