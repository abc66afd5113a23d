//! Attachment pipeline: size/type verification and constrained compression
//! for per-line binaries.

use async_trait::async_trait;
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::OrderError;
use crate::models::Attachment;

const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/bmp"];
const ACCEPTED_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/bmp",
    "application/pdf",
];

/// Longest edge passed to the compression transform.
const MAX_WIDTH_OR_HEIGHT: u32 = 1920;

/// A binary handed to the pipeline by the caller.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

/// Constraint handed to the external compression transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionConstraint {
    pub max_size_mb: f64,
    pub max_width_or_height: u32,
}

/// External compress-to-constraint transform. Consumed as a black box: the
/// pipeline re-verifies its output against the ceiling regardless.
#[async_trait]
pub trait Compressor: Send + Sync {
    async fn compress(
        &self,
        file: &IncomingFile,
        constraint: &CompressionConstraint,
    ) -> Result<Vec<u8>, anyhow::Error>;
}

fn is_image(content_type: &str) -> bool {
    IMAGE_TYPES.contains(&content_type)
}

/// Rebuild the display name from the original file name, keeping its
/// extension. The compressed binary's internal name is regenerated by the
/// transform, so the original name is re-applied here.
fn resolved_file_name(original: &str) -> String {
    let path = Path::new(original);
    match (path.file_stem(), path.extension()) {
        (Some(stem), Some(ext)) => {
            format!("{}.{}", stem.to_string_lossy(), ext.to_string_lossy())
        }
        _ => original.to_string(),
    }
}

/// Verify (and, for oversized images, compress) an incoming binary.
///
/// `limit_bytes` is the document-kind ceiling
/// ([`crate::models::DocumentKind::attachment_limit_bytes`]). Once
/// compression has been attempted for a size-rejected input, the original
/// binary is never silently substituted.
pub async fn prepare(
    file: IncomingFile,
    limit_bytes: usize,
    compressor: &dyn Compressor,
) -> Result<Attachment, OrderError> {
    if !ACCEPTED_TYPES.contains(&file.content_type.as_str()) {
        return Err(OrderError::Attachment(format!(
            "unsupported file type {}; allowed: images and PDF",
            file.content_type
        )));
    }

    if file.bytes.len() <= limit_bytes {
        return Ok(Attachment {
            bytes: file.bytes.clone(),
            file_name: resolved_file_name(&file.file_name),
            preview_handle: Uuid::new_v4().to_string(),
        });
    }

    // Non-image files skip compression entirely.
    if !is_image(&file.content_type) {
        return Err(OrderError::Attachment(format!(
            "{} is {} bytes, over the {} byte limit",
            file.file_name,
            file.bytes.len(),
            limit_bytes
        )));
    }

    let constraint = CompressionConstraint {
        max_size_mb: limit_bytes as f64 / (1024.0 * 1024.0),
        max_width_or_height: MAX_WIDTH_OR_HEIGHT,
    };
    let compressed = compressor.compress(&file, &constraint).await.map_err(|e| {
        warn!(file_name = %file.file_name, error = %e, "Attachment compression failed");
        OrderError::Attachment(format!("could not compress {}: {}", file.file_name, e))
    })?;

    if compressed.len() > limit_bytes {
        return Err(OrderError::Attachment(format!(
            "{} still exceeds the {} byte limit after compression",
            file.file_name, limit_bytes
        )));
    }

    info!(
        file_name = %file.file_name,
        original_size = file.bytes.len(),
        compressed_size = compressed.len(),
        "Attachment compressed"
    );

    Ok(Attachment {
        bytes: compressed,
        file_name: resolved_file_name(&file.file_name),
        preview_handle: Uuid::new_v4().to_string(),
    })
}
