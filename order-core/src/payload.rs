//! Submission payload contract and item hydration.
//!
//! The document service accepts a flat multipart-style field family: scalar
//! document fields at the top level, plus `items[i][<field>]` per ledger
//! entry (0-based, order-preserving). Omitted optionals are sent as empty
//! strings so the receiving schema stays stable.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value as Json;

use crate::error::OrderError;
use crate::ledger::Ledger;
use crate::models::{generate_unique_code, DocumentKind, LineItem, OrderDocument, Priority};
use crate::pricing::Totals;

/// One submission field: plain text or an attachment binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    File { file_name: String, bytes: Vec<u8> },
}

/// Ordered field list for one submission.
#[derive(Debug, Clone, Default)]
pub struct Payload {
    fields: Vec<(String, Value)>,
}

impl Payload {
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    /// Look up a text field by name.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|(n, v)| match v {
            Value::Text(s) if n == name => Some(s.as_str()),
            _ => None,
        })
    }

    fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), Value::Text(value.into())));
    }

    fn push_file(&mut self, name: impl Into<String>, file_name: String, bytes: Vec<u8>) {
        self.fields
            .push((name.into(), Value::File { file_name, bytes }));
    }
}

/// Format a Decimal as a normalized string.
pub fn format_decimal(d: &Decimal) -> String {
    let s = d.to_string();
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Serialize the full document graph for transactional submission.
pub fn build(document: &OrderDocument, totals: &Totals) -> Payload {
    let mut payload = Payload::default();

    payload.push_text(
        "customer_id",
        document
            .customer
            .as_ref()
            .map(|c| c.customer_id.clone())
            .unwrap_or_default(),
    );
    match document.kind {
        DocumentKind::Bill => {
            payload.push_text("invoice_no", document.invoice_number.clone().unwrap_or_default());
        }
        DocumentKind::Quote => {
            payload.push_text(
                "priority",
                document.priority.map(|p| p.as_str()).unwrap_or_default(),
            );
        }
    }
    payload.push_text(
        "delivery_date",
        document
            .delivery_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    );
    payload.push_text("order_terms", document.order_terms.clone());
    payload.push_text("discount", format_decimal(&document.discount));
    payload.push_text(
        "additional_charges",
        format_decimal(&document.additional_charges),
    );
    payload.push_text("gst_rate", format_decimal(&document.gst_rate));
    payload.push_text("sub_total", format_decimal(&totals.sub_total));
    payload.push_text("grand_total", format_decimal(&totals.grand_total));
    payload.push_text("is_draft", if document.is_draft { "1" } else { "0" });

    for (i, item) in document.ledger.items().iter().enumerate() {
        let field = |name: &str| format!("items[{}][{}]", i, name);

        payload.push_text(field("id"), item.id.to_string());
        payload.push_text(field("product_id"), item.product_id.clone());
        payload.push_text(field("name"), item.name.clone());
        payload.push_text(field("model"), item.model.clone());
        payload.push_text(field("unique_code"), item.unique_code.clone());
        payload.push_text(field("qty"), item.quantity.to_string());
        payload.push_text(field("size"), item.size.clone());
        payload.push_text(field("cost"), format_decimal(&item.cost));
        payload.push_text(field("rate"), format_decimal(&item.unit_price));
        if document.kind.uses_groups() {
            payload.push_text(field("narration"), item.narration.clone().unwrap_or_default());
            payload.push_text(field("group"), item.group.clone().unwrap_or_default());
        }
        if let Some(attachment) = &item.attachment {
            payload.push_file(
                field("document"),
                attachment.file_name.clone(),
                attachment.bytes.clone(),
            );
        }
    }

    payload
}

fn json_text(record: &Json, key: &str) -> String {
    match record.get(key) {
        Some(Json::String(s)) => s.clone(),
        Some(Json::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn json_decimal(record: &Json, key: &str) -> Option<Decimal> {
    match record.get(key)? {
        Json::String(s) => s.trim().parse().ok(),
        Json::Number(n) => n.to_string().parse().ok(),
        _ => None,
    }
}

fn json_quantity(record: &Json, key: &str) -> u32 {
    let parsed = match record.get(key) {
        Some(Json::String(s)) => s.trim().parse::<i64>().ok(),
        Some(Json::Number(n)) => n.as_i64(),
        _ => None,
    };
    match parsed {
        Some(q) if q >= 1 => q.min(i64::from(u32::MAX)) as u32,
        _ => 1,
    }
}

/// Parse a previously persisted item array back into a ledger.
///
/// Legacy or partially populated records are tolerated: numbers may arrive
/// as strings, and a missing or non-numeric `cost` falls back to
/// `rate x qty` so the reconstructed ledger is always consistent.
pub fn hydrate_items(kind: DocumentKind, raw: &str) -> Result<Ledger, OrderError> {
    let parsed: Json =
        serde_json::from_str(raw).map_err(|e| OrderError::Hydration(e.to_string()))?;
    let records = parsed
        .as_array()
        .ok_or_else(|| OrderError::Hydration("expected an array of items".to_string()))?;

    Ok(Ledger::from_items(kind, hydrate_records(kind, records)?))
}

/// Restore a full persisted document record for an edit flow: document-level
/// scalars plus the embedded item array. Parsing is as lenient as the item
/// path; the priority wire word in particular goes through
/// [`Priority::from_string`].
pub fn hydrate_document(kind: DocumentKind, raw: &str) -> Result<OrderDocument, OrderError> {
    let parsed: Json =
        serde_json::from_str(raw).map_err(|e| OrderError::Hydration(e.to_string()))?;
    if !parsed.is_object() {
        return Err(OrderError::Hydration(
            "expected a document record".to_string(),
        ));
    }

    let mut document = OrderDocument::new(kind);
    match kind {
        DocumentKind::Bill => {
            let number = json_text(&parsed, "invoice_no");
            if !number.is_empty() {
                document.invoice_number = Some(number);
            }
        }
        DocumentKind::Quote => {
            let priority = json_text(&parsed, "priority");
            if !priority.is_empty() {
                document.priority = Some(Priority::from_string(&priority));
            }
        }
    }
    document.order_terms = json_text(&parsed, "order_terms");
    document.discount = json_decimal(&parsed, "discount").unwrap_or(Decimal::ZERO);
    document.additional_charges =
        json_decimal(&parsed, "additional_charges").unwrap_or(Decimal::ZERO);
    document.gst_rate = json_decimal(&parsed, "gst_rate").unwrap_or(Decimal::ZERO);
    document.is_draft = json_flag(&parsed, "is_draft");
    document.delivery_date = parsed
        .get("delivery_date")
        .and_then(Json::as_str)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

    let items = match parsed.get("items") {
        Some(Json::Array(records)) => hydrate_records(kind, records)?,
        _ => Vec::new(),
    };
    document.ledger = Ledger::from_items(kind, items);

    Ok(document)
}

fn json_flag(record: &Json, key: &str) -> bool {
    match record.get(key) {
        Some(Json::Bool(b)) => *b,
        Some(Json::Number(n)) => n.as_i64() == Some(1),
        Some(Json::String(s)) => s == "1" || s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn hydrate_records(kind: DocumentKind, records: &[Json]) -> Result<Vec<LineItem>, OrderError> {
    let mut items = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let quantity = json_quantity(record, "qty");
        let unit_price = json_decimal(record, "rate")
            .or_else(|| json_decimal(record, "unitPrice"))
            .unwrap_or(Decimal::ZERO);
        let cost = json_decimal(record, "cost")
            .unwrap_or_else(|| unit_price * Decimal::from(quantity));

        let model = json_text(record, "model");
        let unique_code = match json_text(record, "unique_code") {
            code if code.is_empty() => generate_unique_code(&model),
            code => code,
        };
        let id = match record.get("id").and_then(Json::as_i64) {
            Some(id) => id,
            // Synthesize a stable in-ledger id for records without one.
            None => i as i64 + 1,
        };

        items.push(LineItem {
            id,
            product_id: json_text(record, "product_id"),
            group: if kind.uses_groups() {
                Some(json_text(record, "group"))
            } else {
                None
            },
            name: json_text(record, "name"),
            model,
            size: json_text(record, "size"),
            quantity,
            unit_price,
            cost,
            unique_code,
            narration: if kind.uses_groups() {
                Some(json_text(record, "narration"))
            } else {
                None
            },
            attachment: None,
        });
    }

    Ok(items)
}
