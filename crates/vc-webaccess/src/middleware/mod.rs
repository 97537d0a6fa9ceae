//! Middleware stack for the web access router.
//!
//! Layer order: Request → BodyLimit → Tracing → Handler

pub mod tracing;

pub use tracing::TracingLayer;
