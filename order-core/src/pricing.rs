//! Pricing and tax engine.
//!
//! Pure function of the ledger and document-level inputs. Totals are always
//! recomputed from scratch after a mutation, never patched incrementally,
//! so displayed figures cannot drift from the ledger's true contents.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::ledger::Ledger;

/// Document-level pricing inputs.
#[derive(Debug, Clone, Default)]
pub struct PricingInputs<'a> {
    pub discount: Decimal,
    pub additional_charges: Decimal,
    /// GST percentage, `[0, 100]`.
    pub gst_rate: Decimal,
    /// Customer's state; `None` until a customer is selected, in which case
    /// no jurisdiction split is computed.
    pub customer_state: Option<&'a str>,
}

/// Jurisdiction split of the GST amount. Display-only breakdown; it does
/// not participate in `grand_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxSplit {
    /// Customer in the seller's home state: two equal halves, each rounded
    /// to 2 decimal places independently. The halves may differ from an
    /// exact bisection by a rounding unit; that is accepted, not corrected.
    Intrastate { cgst: Decimal, sgst: Decimal },
    /// Interstate sale: a single integrated line, exact.
    Interstate { igst: Decimal },
}

/// Derived monetary totals for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Totals {
    pub sub_total: Decimal,
    pub after_discount: Decimal,
    pub gst_amount: Decimal,
    pub grand_total: Decimal,
    pub split: Option<TaxSplit>,
}

/// Compute totals and the jurisdiction split.
///
/// The engine never clamps: a discount larger than the subtotal yields a
/// negative grand total here, and submission validation rejects it at the
/// boundary.
pub fn compute(ledger: &Ledger, inputs: &PricingInputs<'_>, home_state: &str) -> Totals {
    let sub_total = ledger.sub_total();
    let after_discount = sub_total - inputs.discount + inputs.additional_charges;
    let gst_amount = after_discount * inputs.gst_rate / Decimal::from(100);
    let grand_total = after_discount + gst_amount;

    let split = inputs.customer_state.map(|state| {
        if state.eq_ignore_ascii_case(home_state) {
            let half = (gst_amount / Decimal::from(2))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            TaxSplit::Intrastate {
                cgst: half,
                sgst: half,
            }
        } else {
            TaxSplit::Interstate { igst: gst_amount }
        }
    });

    Totals {
        sub_total,
        after_discount,
        gst_amount,
        grand_total,
        split,
    }
}
