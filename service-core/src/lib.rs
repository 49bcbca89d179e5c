//! service-core: Shared infrastructure for the products platform services.
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod observability;
