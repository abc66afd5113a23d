//! Glue around the order composition engine: configuration, structured
//! logging, and the HTTP transport implementing
//! [`order_core::lifecycle::DocumentService`].

pub mod config;
pub mod observability;
pub mod services;

pub use config::Settings;
pub use services::DocumentServiceClient;
