//! Attachment pipeline: type/size verification and constrained compression.

use async_trait::async_trait;
use order_core::attachment::{self, CompressionConstraint, Compressor, IncomingFile};
use order_core::models::DocumentKind;
use order_core::OrderError;
use std::sync::atomic::{AtomicUsize, Ordering};

const LIMIT: usize = 1000;

/// Compressor double: emits a fixed-size output, or fails when `output_len`
/// is `None`.
struct StubCompressor {
    output_len: Option<usize>,
    calls: AtomicUsize,
}

impl StubCompressor {
    fn emitting(len: usize) -> Self {
        Self {
            output_len: Some(len),
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            output_len: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Compressor for StubCompressor {
    async fn compress(
        &self,
        _file: &IncomingFile,
        _constraint: &CompressionConstraint,
    ) -> Result<Vec<u8>, anyhow::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.output_len {
            Some(len) => Ok(vec![0u8; len]),
            None => Err(anyhow::anyhow!("encoder crashed")),
        }
    }
}

fn file(name: &str, content_type: &str, len: usize) -> IncomingFile {
    IncomingFile {
        bytes: vec![7u8; len],
        file_name: name.to_string(),
        content_type: content_type.to_string(),
    }
}

#[tokio::test]
async fn small_image_passes_through_without_compression() {
    let compressor = StubCompressor::emitting(1);

    let attachment = attachment::prepare(file("site.jpg", "image/jpeg", 500), LIMIT, &compressor)
        .await
        .expect("Failed to prepare attachment");

    assert_eq!(attachment.bytes.len(), 500);
    assert_eq!(attachment.file_name, "site.jpg");
    assert!(!attachment.preview_handle.is_empty());
    assert_eq!(compressor.call_count(), 0);
}

#[tokio::test]
async fn oversized_image_is_compressed_and_accepted() {
    let compressor = StubCompressor::emitting(800);

    let attachment = attachment::prepare(
        file("site-photo.png", "image/png", 5000),
        LIMIT,
        &compressor,
    )
    .await
    .expect("Failed to prepare attachment");

    assert_eq!(attachment.bytes.len(), 800);
    assert_eq!(attachment.file_name, "site-photo.png");
    assert_eq!(compressor.call_count(), 1);
}

#[tokio::test]
async fn still_oversized_after_compression_is_rejected() {
    let compressor = StubCompressor::emitting(LIMIT + 1);

    let err = attachment::prepare(file("big.jpg", "image/jpeg", 5000), LIMIT, &compressor)
        .await
        .unwrap_err();

    assert!(matches!(err, OrderError::Attachment(_)));
    assert_eq!(compressor.call_count(), 1);
}

#[tokio::test]
async fn compression_failure_is_rejected() {
    let compressor = StubCompressor::failing();

    let err = attachment::prepare(file("big.jpg", "image/jpeg", 5000), LIMIT, &compressor)
        .await
        .unwrap_err();

    assert!(matches!(err, OrderError::Attachment(_)));
}

#[tokio::test]
async fn pdf_within_ceiling_is_accepted_directly() {
    let compressor = StubCompressor::emitting(1);

    let attachment = attachment::prepare(
        file("drawing.pdf", "application/pdf", 900),
        LIMIT,
        &compressor,
    )
    .await
    .expect("Failed to prepare attachment");

    assert_eq!(attachment.bytes.len(), 900);
    assert_eq!(compressor.call_count(), 0);
}

#[tokio::test]
async fn oversized_pdf_is_rejected_without_compression() {
    let compressor = StubCompressor::emitting(1);

    let err = attachment::prepare(
        file("drawing.pdf", "application/pdf", 2000),
        LIMIT,
        &compressor,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, OrderError::Attachment(_)));
    assert_eq!(compressor.call_count(), 0);
}

#[tokio::test]
async fn unsupported_type_is_rejected() {
    let compressor = StubCompressor::emitting(1);

    let err = attachment::prepare(file("movie.mp4", "video/mp4", 10), LIMIT, &compressor)
        .await
        .unwrap_err();

    assert!(matches!(err, OrderError::Attachment(_)));
}

#[test]
fn ceilings_follow_the_document_kind() {
    assert_eq!(DocumentKind::Bill.attachment_limit_bytes(), 5 * 1024 * 1024);
    assert_eq!(DocumentKind::Quote.attachment_limit_bytes(), 512 * 1024);
}
