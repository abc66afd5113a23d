//! Customer master-data entry.

use serde::{Deserialize, Serialize};

/// Customer as selected on a composition screen. `state` drives the
/// tax-jurisdiction split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: String,
    pub name: String,
    pub state: String,
}
