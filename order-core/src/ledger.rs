//! Line-item ledger: the ordered item collection of one order document.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::error::OrderError;
use crate::models::{generate_unique_code, Attachment, Catalog, DocumentKind, LineItem};

pub const MIN_QUANTITY: i64 = 1;
pub const MAX_QUANTITY: i64 = 10_000;

/// Upper bound shared by unit prices, discounts and additional charges.
pub fn max_amount() -> Decimal {
    Decimal::from(10_000_000u32)
}

/// Input for adding a line item. `product_ref` is nullable because the UI
/// builds the input incrementally; the ledger rejects a missing reference.
#[derive(Debug, Clone, Default)]
pub struct AddItem {
    pub product_ref: Option<String>,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub group: Option<String>,
    pub narration: Option<String>,
    pub attachment: Option<Attachment>,
}

/// Ordered collection of line items for one document.
///
/// Insertion order is preserved (display-significant). Uniqueness invariant:
/// no two lines share the same `(product, group)` pair; bills ignore the
/// group and key on the product alone.
#[derive(Debug, Clone)]
pub struct Ledger {
    kind: DocumentKind,
    items: Vec<LineItem>,
}

fn validate_quantity(quantity: i64) -> Result<u32, OrderError> {
    if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&quantity) {
        return Err(OrderError::validation(
            "quantity",
            format!(
                "must be a whole number between {} and {}",
                MIN_QUANTITY, MAX_QUANTITY
            ),
        ));
    }
    Ok(quantity as u32)
}

fn validate_unit_price(unit_price: Decimal) -> Result<(), OrderError> {
    if unit_price < Decimal::ZERO || unit_price > max_amount() {
        return Err(OrderError::validation(
            "unit_price",
            format!("must be between 0 and {}", max_amount()),
        ));
    }
    Ok(())
}

impl Ledger {
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Running sum of derived line costs.
    pub fn sub_total(&self) -> Decimal {
        self.items.iter().map(|item| item.cost).sum()
    }

    /// Uniqueness key for a candidate line. Quotes key on `(product, group)`
    /// with `None` and `""` naming the same implicit group; bills key on
    /// the product alone.
    fn is_duplicate(&self, product_ref: &str, group: Option<&str>) -> bool {
        let normalized = |g: Option<&str>| g.unwrap_or("").to_string();
        self.items.iter().any(|item| {
            item.product_id == product_ref
                && (!self.kind.uses_groups()
                    || normalized(item.group.as_deref()) == normalized(group))
        })
    }

    /// Timestamp ids only need to be unique within this ledger; bump past
    /// any collision from two adds landing in the same millisecond.
    fn next_id(&self) -> i64 {
        let mut id = Utc::now().timestamp_millis();
        while self.items.iter().any(|item| item.id == id) {
            id += 1;
        }
        id
    }

    /// Add a line item, snapshotting display fields from the resolved
    /// catalog product.
    #[instrument(skip(self, catalog, input), fields(product_ref = ?input.product_ref))]
    pub fn add_item(
        &mut self,
        catalog: &Catalog,
        input: AddItem,
    ) -> Result<&LineItem, OrderError> {
        let product_ref = input
            .product_ref
            .as_deref()
            .filter(|r| !r.is_empty())
            .ok_or_else(|| OrderError::validation("product", "select a product first"))?;

        let quantity = validate_quantity(input.quantity)?;
        validate_unit_price(input.unit_price)?;

        let product = catalog
            .resolve(product_ref)
            .ok_or_else(|| OrderError::NotFound(format!("product {} not in catalog", product_ref)))?;

        let group = if self.kind.uses_groups() {
            input.group.clone()
        } else {
            None
        };
        if self.is_duplicate(product_ref, group.as_deref()) {
            return Err(OrderError::DuplicateItem {
                product_ref: product_ref.to_string(),
                group,
            });
        }

        let mut item = LineItem {
            id: self.next_id(),
            product_id: product.product_id.clone(),
            group,
            name: product.name.clone(),
            model: product.model.clone(),
            size: product.size.clone(),
            quantity,
            unit_price: input.unit_price,
            cost: Decimal::ZERO,
            unique_code: generate_unique_code(&product.model),
            narration: if self.kind.uses_groups() {
                input.narration
            } else {
                None
            },
            attachment: input.attachment,
        };
        item.recompute_cost();

        info!(item_id = item.id, product_id = %item.product_id, "Line item added");

        self.items.push(item);
        let added = self.items.len() - 1;
        Ok(&self.items[added])
    }

    /// Remove a line item; a missing id is a no-op. The confirmation step
    /// happens at the caller boundary.
    #[instrument(skip(self))]
    pub fn remove_item(&mut self, item_id: i64) {
        let before = self.items.len();
        self.items.retain(|item| item.id != item_id);
        if self.items.len() < before {
            info!(item_id = item_id, "Line item removed");
        }
    }

    /// Change a line's quantity, recomputing its cost. The item is left
    /// untouched on a bound violation.
    pub fn update_quantity(&mut self, item_id: i64, quantity: i64) -> Result<(), OrderError> {
        let quantity = validate_quantity(quantity)?;
        let item = self.find_mut(item_id)?;
        item.quantity = quantity;
        item.recompute_cost();
        Ok(())
    }

    /// Change a line's unit price, recomputing its cost symmetrically.
    pub fn update_price(&mut self, item_id: i64, unit_price: Decimal) -> Result<(), OrderError> {
        validate_unit_price(unit_price)?;
        let item = self.find_mut(item_id)?;
        item.unit_price = unit_price;
        item.recompute_cost();
        Ok(())
    }

    /// Replace a line's attachment (or clear it).
    pub fn set_attachment(
        &mut self,
        item_id: i64,
        attachment: Option<Attachment>,
    ) -> Result<(), OrderError> {
        let item = self.find_mut(item_id)?;
        item.attachment = attachment;
        Ok(())
    }

    fn find_mut(&mut self, item_id: i64) -> Result<&mut LineItem, OrderError> {
        self.items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| OrderError::NotFound(format!("line item {} not in ledger", item_id)))
    }

    /// Rebuild a ledger from already-reconstructed items (hydration path).
    pub(crate) fn from_items(kind: DocumentKind, items: Vec<LineItem>) -> Self {
        Self { kind, items }
    }
}
