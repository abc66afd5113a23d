//! Document lifecycle controller: validation, single-flight submission, and
//! edit-flow hydration.

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use crate::error::OrderError;
use crate::models::{DocumentKind, OrderDocument};
use crate::payload::{self, Payload};

/// Remote persistence collaborator. The payload is submitted as one atomic
/// request; a failure leaves no partial write behind.
#[async_trait]
pub trait DocumentService: Send + Sync {
    /// Persist a new document, returning its server-assigned id.
    async fn create(&self, kind: DocumentKind, payload: &Payload)
        -> Result<String, anyhow::Error>;

    /// Replace an existing document, keyed by its id.
    async fn update(
        &self,
        kind: DocumentKind,
        id: &str,
        payload: &Payload,
    ) -> Result<(), anyhow::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Composing,
    Submitting,
    Persisted,
}

/// One composition session: owns the document, its lifecycle state, and the
/// id of the persisted record when editing.
#[derive(Debug)]
pub struct OrderComposer {
    document: OrderDocument,
    existing_id: Option<String>,
    state: LifecycleState,
}

impl OrderComposer {
    /// Start composing a new document.
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            document: OrderDocument::new(kind),
            existing_id: None,
            state: LifecycleState::Composing,
        }
    }

    /// Re-open a persisted document for editing. `persisted_items` is the
    /// serialized item array from the earlier submission; it is parsed
    /// defensively so legacy records still produce a consistent ledger.
    pub fn for_edit(
        kind: DocumentKind,
        document_id: impl Into<String>,
        persisted_items: &str,
    ) -> Result<Self, OrderError> {
        let ledger = payload::hydrate_items(kind, persisted_items)?;
        let mut document = OrderDocument::new(kind);
        document.ledger = ledger;
        Ok(Self {
            document,
            existing_id: Some(document_id.into()),
            state: LifecycleState::Composing,
        })
    }

    /// Re-open a persisted document from its full record: document-level
    /// scalars (priority/invoice number, discount, draft flag, dates) plus
    /// the embedded item array, all parsed leniently.
    pub fn for_edit_record(
        kind: DocumentKind,
        document_id: impl Into<String>,
        record: &str,
    ) -> Result<Self, OrderError> {
        let document = payload::hydrate_document(kind, record)?;
        Ok(Self {
            document,
            existing_id: Some(document_id.into()),
            state: LifecycleState::Composing,
        })
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn document(&self) -> &OrderDocument {
        &self.document
    }

    /// Mutable access for composition-time edits (customer selection, ledger
    /// mutations, document fields).
    pub fn document_mut(&mut self) -> &mut OrderDocument {
        &mut self.document
    }

    /// Completeness check run before any submission. Failures surface a
    /// user-facing message and leave the document in `Composing`.
    pub fn validate(&self, home_state: &str) -> Result<(), OrderError> {
        if self.document.customer.is_none() {
            return Err(OrderError::validation("customer", "select a customer"));
        }
        if self.document.ledger.is_empty() {
            return Err(OrderError::validation(
                "items",
                "add at least one item before saving",
            ));
        }
        match self.document.kind {
            DocumentKind::Bill => {
                let missing = self
                    .document
                    .invoice_number
                    .as_deref()
                    .map(|n| n.trim().is_empty())
                    .unwrap_or(true);
                if missing {
                    return Err(OrderError::validation(
                        "invoice_number",
                        "enter an invoice number",
                    ));
                }
            }
            DocumentKind::Quote => {
                if self.document.priority.is_none() {
                    return Err(OrderError::validation("priority", "select a priority"));
                }
            }
        }
        if self.document.totals(home_state).grand_total < Decimal::ZERO {
            return Err(OrderError::validation(
                "discount",
                "grand total cannot be negative",
            ));
        }
        Ok(())
    }

    /// Validate, serialize, and submit the document.
    ///
    /// Create for new documents, update for edits. On success the session
    /// transitions to `Persisted`; on failure it returns to `Composing` with
    /// all in-memory state intact for an explicit user retry. Only one
    /// submission may be outstanding at a time; draft and finalize share the
    /// guard.
    #[instrument(skip(self, service), fields(kind = ?self.document.kind, as_draft = as_draft))]
    pub async fn submit(
        &mut self,
        service: &dyn DocumentService,
        home_state: &str,
        as_draft: bool,
    ) -> Result<String, OrderError> {
        match self.state {
            LifecycleState::Submitting => return Err(OrderError::SubmissionInFlight),
            LifecycleState::Persisted => {
                return Err(OrderError::Submission(anyhow::anyhow!(
                    "document already persisted"
                )))
            }
            LifecycleState::Composing => {}
        }

        self.document.is_draft = as_draft;
        self.validate(home_state)?;

        let totals = self.document.totals(home_state);
        let payload = payload::build(&self.document, &totals);

        self.state = LifecycleState::Submitting;
        let result = match &self.existing_id {
            Some(id) => service
                .update(self.document.kind, id, &payload)
                .await
                .map(|_| id.clone()),
            None => service.create(self.document.kind, &payload).await,
        };

        match result {
            Ok(id) => {
                self.state = LifecycleState::Persisted;
                info!(document_id = %id, "Document persisted");
                Ok(id)
            }
            Err(e) => {
                self.state = LifecycleState::Composing;
                warn!(error = %e, "Document submission failed");
                Err(OrderError::Submission(e))
            }
        }
    }
}
