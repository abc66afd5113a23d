//! Domain models for the order composition engine.

mod customer;
mod document;
mod line_item;
mod product;

pub use customer::Customer;
pub use document::{DocumentKind, OrderDocument, Priority, MAX_ORDER_TERMS_LEN};
pub use line_item::{Attachment, LineItem};

pub(crate) use line_item::generate_unique_code;
pub use product::{Catalog, Product};
