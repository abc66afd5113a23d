//! Order composition and pricing engine.
//!
//! One engine behind the bill and quote composition screens: a line-item
//! ledger with a uniqueness invariant, a pure pricing/tax computation with
//! jurisdiction-aware GST splitting, a document lifecycle controller with a
//! single-flight submission guard, and an attachment pipeline with
//! constrained compression. Remote persistence and the compression
//! transform are trait seams ([`lifecycle::DocumentService`],
//! [`attachment::Compressor`]).

pub mod attachment;
pub mod error;
pub mod ledger;
pub mod lifecycle;
pub mod models;
pub mod payload;
pub mod pricing;

pub use error::OrderError;
pub use ledger::{AddItem, Ledger, MAX_QUANTITY, MIN_QUANTITY};
pub use lifecycle::{DocumentService, LifecycleState, OrderComposer};
pub use models::{
    Attachment, Catalog, Customer, DocumentKind, LineItem, OrderDocument, Priority, Product,
};
pub use pricing::{PricingInputs, TaxSplit, Totals};
