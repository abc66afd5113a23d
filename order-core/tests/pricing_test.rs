//! Pricing and tax engine properties.

use order_core::ledger::{AddItem, Ledger};
use order_core::models::{Catalog, DocumentKind, Product};
use order_core::pricing::{self, PricingInputs, TaxSplit};
use rust_decimal::Decimal;

const HOME_STATE: &str = "Bihar";

fn dec(s: &str) -> Decimal {
    s.parse().expect("bad decimal literal")
}

fn catalog() -> Catalog {
    Catalog::new(vec![Product {
        product_id: "P-1".to_string(),
        name: "Panel".to_string(),
        model: "PN-1".to_string(),
        size: "2x2".to_string(),
        default_price: dec("1000"),
        image_ref: None,
    }])
}

fn ledger_with(qty: i64, price: &str) -> Ledger {
    let mut ledger = Ledger::new(DocumentKind::Bill);
    ledger
        .add_item(
            &catalog(),
            AddItem {
                product_ref: Some("P-1".to_string()),
                quantity: qty,
                unit_price: dec(price),
                ..AddItem::default()
            },
        )
        .expect("Failed to add item");
    ledger
}

fn inputs<'a>(gst: &str, state: Option<&'a str>) -> PricingInputs<'a> {
    PricingInputs {
        discount: Decimal::ZERO,
        additional_charges: Decimal::ZERO,
        gst_rate: dec(gst),
        customer_state: state,
    }
}

#[test]
fn reference_scenario_totals() {
    let ledger = ledger_with(2, "1000");
    let totals = pricing::compute(&ledger, &inputs("18", None), HOME_STATE);

    assert_eq!(totals.sub_total, dec("2000"));
    assert_eq!(totals.after_discount, dec("2000"));
    assert_eq!(totals.gst_amount, dec("360"));
    assert_eq!(totals.grand_total, dec("2360"));
}

#[test]
fn same_state_customer_gets_equal_halves() {
    let ledger = ledger_with(2, "1000");
    let totals = pricing::compute(&ledger, &inputs("18", Some("Bihar")), HOME_STATE);

    match totals.split {
        Some(TaxSplit::Intrastate { cgst, sgst }) => {
            assert_eq!(cgst, dec("180.00"));
            assert_eq!(sgst, dec("180.00"));
        }
        other => panic!("expected intrastate split, got {:?}", other),
    }
}

#[test]
fn different_state_customer_gets_single_igst_line() {
    let ledger = ledger_with(2, "1000");
    let totals = pricing::compute(&ledger, &inputs("18", Some("Kerala")), HOME_STATE);

    match totals.split {
        Some(TaxSplit::Interstate { igst }) => assert_eq!(igst, dec("360")),
        other => panic!("expected interstate split, got {:?}", other),
    }
}

#[test]
fn no_split_until_a_customer_is_selected() {
    let ledger = ledger_with(2, "1000");
    let totals = pricing::compute(&ledger, &inputs("18", None), HOME_STATE);
    assert!(totals.split.is_none());
}

#[test]
fn state_comparison_is_case_insensitive() {
    let ledger = ledger_with(1, "100");
    let totals = pricing::compute(&ledger, &inputs("18", Some("BIHAR")), "bihar");
    assert!(matches!(totals.split, Some(TaxSplit::Intrastate { .. })));
}

#[test]
fn halves_are_rounded_independently_within_one_unit() {
    // 9 x 123.45 = 1110.15; 18% GST = 199.827, an odd amount to bisect.
    let ledger = ledger_with(9, "123.45");
    let totals = pricing::compute(&ledger, &inputs("18", Some("Bihar")), HOME_STATE);

    match totals.split {
        Some(TaxSplit::Intrastate { cgst, sgst }) => {
            assert_eq!(cgst, sgst);
            let drift = (cgst + sgst - totals.gst_amount).abs();
            assert!(drift <= dec("0.01"), "drift {} exceeds a rounding unit", drift);
        }
        other => panic!("expected intrastate split, got {:?}", other),
    }
}

#[test]
fn discount_and_additional_charges_shift_the_base() {
    let ledger = ledger_with(2, "1000");
    let totals = pricing::compute(
        &ledger,
        &PricingInputs {
            discount: dec("500"),
            additional_charges: dec("100"),
            gst_rate: dec("10"),
            customer_state: None,
        },
        HOME_STATE,
    );

    assert_eq!(totals.after_discount, dec("1600"));
    assert_eq!(totals.gst_amount, dec("160"));
    assert_eq!(totals.grand_total, dec("1760"));
}

#[test]
fn totals_are_idempotent_for_fixed_inputs() {
    let ledger = ledger_with(3, "333.33");
    let first = pricing::compute(&ledger, &inputs("12", Some("Bihar")), HOME_STATE);
    let second = pricing::compute(&ledger, &inputs("12", Some("Bihar")), HOME_STATE);
    assert_eq!(first, second);
}

#[test]
fn engine_reports_negative_results_without_clamping() {
    let ledger = ledger_with(1, "100");
    let totals = pricing::compute(
        &ledger,
        &PricingInputs {
            discount: dec("500"),
            additional_charges: Decimal::ZERO,
            gst_rate: dec("18"),
            customer_state: None,
        },
        HOME_STATE,
    );

    assert!(totals.grand_total < Decimal::ZERO);
}

#[test]
fn zero_rate_yields_no_tax() {
    let ledger = ledger_with(2, "1000");
    let totals = pricing::compute(&ledger, &inputs("0", Some("Bihar")), HOME_STATE);

    assert_eq!(totals.gst_amount, Decimal::ZERO);
    assert_eq!(totals.grand_total, dec("2000"));
    match totals.split {
        Some(TaxSplit::Intrastate { cgst, sgst }) => {
            assert_eq!(cgst, dec("0.00"));
            assert_eq!(sgst, dec("0.00"));
        }
        other => panic!("expected intrastate split, got {:?}", other),
    }
}
