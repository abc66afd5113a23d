//! Line item model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Binary attached to a single line item.
///
/// `preview_handle` is transient UI state; only the bytes and the resolved
/// file name ever reach the submission payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub file_name: String,
    #[serde(skip)]
    pub preview_handle: String,
}

/// One line of an order document.
///
/// `name`, `model` and `size` are snapshots taken from the catalog at
/// add-time, not live references. `cost` is derived and never set
/// independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// Millisecond-timestamp id, unique within one ledger only.
    pub id: i64,
    pub product_id: String,
    /// Free-text categorization tag; quotes only. `None` and the empty
    /// string name the same implicit group.
    pub group: Option<String>,
    pub name: String,
    pub model: String,
    pub size: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub cost: Decimal,
    /// Display-only traceability code, `model@NNNN`. Cosmetic.
    pub unique_code: String,
    pub narration: Option<String>,
    pub attachment: Option<Attachment>,
}

impl LineItem {
    /// Recompute the derived cost after a quantity or price edit.
    pub(crate) fn recompute_cost(&mut self) {
        self.cost = self.unit_price * Decimal::from(self.quantity);
    }
}

/// Generate the display-only traceability code for a line.
pub(crate) fn generate_unique_code(model: &str) -> String {
    use rand::Rng;
    let digits: u16 = rand::thread_rng().gen_range(1000..=9999);
    format!("{}@{}", model, digits)
}
