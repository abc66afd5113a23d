//! Collaborator clients for the composition engine.

mod document_client;

pub use document_client::DocumentServiceClient;
