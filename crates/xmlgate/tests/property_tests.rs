//! Property-based tests for envelope validation
//!
//! These tests use proptest to verify:
//! 1. The control check always names the first missing field, whatever the
//!    element order in the document
//! 2. Validation is repeatable: the same tree always gives the same outcome
//! 3. Arbitrary input never panics the pipeline

use proptest::prelude::*;
use xmlgate::envelope::ControlField;
use xmlgate::{parse_tree, process, validate, EnvelopeError};

/// Strategy for element text that survives trimming
fn arb_text() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_-]{1,12}"
}

/// Control children as (field, present) in a shuffled document order
fn arb_control() -> impl Strategy<Value = Vec<(ControlField, bool)>> {
    prop::collection::vec(any::<bool>(), 6).prop_flat_map(|present| {
        let fields: Vec<(ControlField, bool)> = ControlField::ALL.into_iter().zip(present).collect();
        Just(fields).prop_shuffle()
    })
}

fn envelope(control: &[(ControlField, bool)], session: &str, keys: &str) -> String {
    let control: String = control
        .iter()
        .filter(|(_, present)| *present)
        .map(|(field, _)| format!("<{0}>v</{0}>", field.tag()))
        .collect();
    format!(
        "<request><control>{control}</control><operation>\
         <authentication><sessionid>{session}</sessionid></authentication>\
         <content><function controlid=\"f\"><readbyname>\
         <object>CUSTOMER</object><keys>{keys}</keys><fields>CUSTOMERID</fields>\
         </readbyname></function></content></operation></request>"
    )
}

proptest! {
    #[test]
    fn control_error_names_first_missing_field(control in arb_control()) {
        let tree = parse_tree(&envelope(&control, "s", "1"))
            .map_err(|err| TestCaseError::fail(err.to_string()))?;

        let first_missing = ControlField::ALL
            .into_iter()
            .find(|field| control.iter().any(|(f, present)| f == field && !present));

        match first_missing {
            Some(field) => prop_assert_eq!(
                validate(&tree),
                Err(EnvelopeError::InvalidControlField(field))
            ),
            None => prop_assert!(validate(&tree).is_ok()),
        }
    }

    #[test]
    fn validation_is_repeatable(
        control in arb_control(),
        session in arb_text(),
        keys in prop_oneof![Just(String::new()), arb_text()],
    ) {
        let tree = parse_tree(&envelope(&control, &session, &keys))
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert_eq!(validate(&tree), validate(&tree));
    }

    #[test]
    fn arbitrary_input_never_panics(input in ".*") {
        let response = process(&input);
        prop_assert!(matches!(response.status_code(), 200 | 400));
    }

    #[test]
    fn arbitrary_markup_never_panics(input in "(<[a-z]{1,8}( a=\"[a-z]*\")?/?>|</[a-z]{1,8}>|[a-z &;#]{0,6})*") {
        let response = process(&input);
        prop_assert!(matches!(response.status_code(), 200 | 400));
    }
}
