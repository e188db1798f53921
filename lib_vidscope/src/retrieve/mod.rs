//! # Data Retrieval Module
//!
//! The HTTP plumbing behind the analysis service.
//!
//! ## Contained Modules:
//!
//! - **`ky_http`**: a generic JSON `ApiClient` built on `reqwest` and
//!   `reqwest-middleware`. Retrying transient failures is opt-in.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, unused_qualifications)]

/// Generic JSON HTTP client with optional retry middleware.
pub mod ky_http;
