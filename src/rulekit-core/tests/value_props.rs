//! Coercion laws over arbitrary scalar values.

use std::cmp::Ordering;

use proptest::prelude::*;
use rulekit_core::Value;

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Undefined),
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1000i32..1000).prop_map(Value::from),
        "[0-9]{0,3}".prop_map(Value::from),
        "[a-c ]{0,3}".prop_map(Value::from),
    ]
}

proptest! {
    #[test]
    fn prop_loose_equality_is_symmetric(a in arb_scalar(), b in arb_scalar()) {
        prop_assert_eq!(a.loose_eq(&b), b.loose_eq(&a));
    }

    #[test]
    fn prop_strict_implies_loose(a in arb_scalar(), b in arb_scalar()) {
        if a.strict_eq(&b) {
            prop_assert!(a.loose_eq(&b));
        }
    }

    #[test]
    fn prop_compare_is_antisymmetric(a in arb_scalar(), b in arb_scalar()) {
        prop_assert_eq!(a.compare(&b), b.compare(&a).map(Ordering::reverse));
    }

    #[test]
    fn prop_int32_round_trips(n in any::<i32>()) {
        prop_assert_eq!(Value::from(n).to_int32(), n);
    }
}
