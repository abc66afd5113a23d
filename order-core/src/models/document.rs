//! Order document model: the document-level fields around the ledger.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::OrderError;
use crate::ledger::{max_amount, Ledger};
use crate::models::Customer;
use crate::pricing::{self, PricingInputs, Totals};

/// Maximum length of the free-text order terms.
pub const MAX_ORDER_TERMS_LEN: usize = 1000;

/// Document type; parameterizes the one engine for the bill and quote
/// screens instead of four near-identical copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Bill,
    Quote,
}

impl DocumentKind {
    /// Quotes categorize lines by free-text group; bills do not.
    pub fn uses_groups(&self) -> bool {
        matches!(self, DocumentKind::Quote)
    }

    /// Absolute attachment size ceiling per line, in bytes.
    pub fn attachment_limit_bytes(&self) -> usize {
        match self {
            // Inspection documents on bill lines.
            DocumentKind::Bill => 5 * 1024 * 1024,
            DocumentKind::Quote => 512 * 1024,
        }
    }

    /// Resource path segment on the document service.
    pub fn resource(&self) -> &'static str {
        match self {
            DocumentKind::Bill => "bills",
            DocumentKind::Quote => "quotes",
        }
    }
}

/// Quote priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Normal,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Normal => "normal",
            Priority::Low => "low",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "high" => Priority::High,
            "low" => Priority::Low,
            _ => Priority::Normal,
        }
    }
}

/// One in-memory sales document under composition.
///
/// Mutated through the validated setters and the ledger operations; derived
/// totals are never stored, only recomputed via [`OrderDocument::totals`].
#[derive(Debug, Clone)]
pub struct OrderDocument {
    pub kind: DocumentKind,
    pub customer: Option<Customer>,
    pub creation_date: NaiveDate,
    pub delivery_date: Option<NaiveDate>,
    /// Required before submission for bills.
    pub invoice_number: Option<String>,
    /// Required before submission for quotes.
    pub priority: Option<Priority>,
    pub order_terms: String,
    pub discount: Decimal,
    pub additional_charges: Decimal,
    pub gst_rate: Decimal,
    pub is_draft: bool,
    pub ledger: Ledger,
}

impl OrderDocument {
    /// Create an empty document for a freshly opened composition screen.
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            customer: None,
            creation_date: Utc::now().date_naive(),
            delivery_date: None,
            invoice_number: None,
            priority: None,
            order_terms: String::new(),
            discount: Decimal::ZERO,
            additional_charges: Decimal::ZERO,
            gst_rate: Decimal::ZERO,
            is_draft: false,
            ledger: Ledger::new(kind),
        }
    }

    pub fn select_customer(&mut self, customer: Customer) {
        self.customer = Some(customer);
    }

    pub fn set_discount(&mut self, discount: Decimal) -> Result<(), OrderError> {
        if discount < Decimal::ZERO || discount > max_amount() {
            return Err(OrderError::validation(
                "discount",
                format!("must be between 0 and {}", max_amount()),
            ));
        }
        self.discount = discount;
        Ok(())
    }

    pub fn set_additional_charges(&mut self, charges: Decimal) -> Result<(), OrderError> {
        if charges < Decimal::ZERO || charges > max_amount() {
            return Err(OrderError::validation(
                "additional_charges",
                format!("must be between 0 and {}", max_amount()),
            ));
        }
        self.additional_charges = charges;
        Ok(())
    }

    /// Set the GST percentage. The choice list itself is master data owned
    /// by the caller; the engine only enforces the numeric bound.
    pub fn set_gst_rate(&mut self, rate: Decimal) -> Result<(), OrderError> {
        if rate < Decimal::ZERO || rate > Decimal::from(100) {
            return Err(OrderError::validation(
                "gst_rate",
                "must be between 0 and 100",
            ));
        }
        self.gst_rate = rate;
        Ok(())
    }

    pub fn set_order_terms(&mut self, terms: impl Into<String>) -> Result<(), OrderError> {
        let terms = terms.into();
        if terms.chars().count() > MAX_ORDER_TERMS_LEN {
            return Err(OrderError::validation(
                "order_terms",
                format!("must be at most {} characters", MAX_ORDER_TERMS_LEN),
            ));
        }
        self.order_terms = terms;
        Ok(())
    }

    pub fn set_delivery_date(&mut self, date: Option<NaiveDate>) {
        self.delivery_date = date;
    }

    /// Recompute totals from the current ledger and document inputs.
    pub fn totals(&self, home_state: &str) -> Totals {
        pricing::compute(
            &self.ledger,
            &PricingInputs {
                discount: self.discount,
                additional_charges: self.additional_charges,
                gst_rate: self.gst_rate,
                customer_state: self.customer.as_ref().map(|c| c.state.as_str()),
            },
            home_state,
        )
    }

    /// Non-blocking advisories. A delivery date before the creation date is
    /// flagged here but never blocks submission.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if let Some(delivery) = self.delivery_date {
            if delivery < self.creation_date {
                warnings.push(format!(
                    "delivery date {} precedes creation date {}",
                    delivery, self.creation_date
                ));
            }
        }
        warnings
    }
}
