//! Property-based tests for the attestation core
//!
//! These use proptest to verify the invariants the crate promises:
//! - Money algebra: commutative/associative add, zero identity, negate inverse
//! - Cross-currency arithmetic always fails
//! - Canonical bytes are deterministic and insertion-order invariant
//! - Quoted confidence never holds a negative spread
//! - Identity hashes separate sources; content hashes do not

use attest_core::{
    canonical_bytes, Attestation, CanonicalValue, Canonicalize, Confidence, Error, Firm, Money,
    QuoteCondition, Quoted,
};
use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Strategy for bounded money amounts (cents, both signs)
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (-1_000_000_00i64..1_000_000_00i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for currency codes
fn currency_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("USD"),
        Just("EUR"),
        Just("GBP"),
        Just("JPY"),
        Just("KWD"),
    ]
}

/// Strategy for small fit-quality style maps (unique keys)
fn metric_map_strategy() -> impl Strategy<Value = Vec<(String, Decimal)>> {
    prop::collection::btree_map("[a-z]{1,8}", amount_strategy(), 1..6)
        .prop_map(|entries| entries.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: addition in one currency is commutative
    #[test]
    fn prop_money_add_commutative(a in amount_strategy(), b in amount_strategy(), ccy in currency_strategy()) {
        let x = Money::new(a, ccy).unwrap();
        let y = Money::new(b, ccy).unwrap();
        prop_assert_eq!(x.add(&y).unwrap(), y.add(&x).unwrap());
    }

    /// Property: addition in one currency is associative
    #[test]
    fn prop_money_add_associative(
        a in amount_strategy(),
        b in amount_strategy(),
        c in amount_strategy(),
        ccy in currency_strategy(),
    ) {
        let x = Money::new(a, ccy).unwrap();
        let y = Money::new(b, ccy).unwrap();
        let z = Money::new(c, ccy).unwrap();
        prop_assert_eq!(
            x.add(&y).unwrap().add(&z).unwrap(),
            x.add(&y.add(&z).unwrap()).unwrap()
        );
    }

    /// Property: zero is the additive identity and negate the inverse
    #[test]
    fn prop_money_zero_and_inverse(a in amount_strategy(), ccy in currency_strategy()) {
        let x = Money::new(a, ccy).unwrap();
        let zero = Money::zero(ccy).unwrap();
        prop_assert_eq!(x.add(&zero).unwrap(), x.clone());
        prop_assert!(x.add(&x.negate()).unwrap().is_zero());
    }

    /// Property: cross-currency arithmetic is always a failure
    #[test]
    fn prop_cross_currency_fails(a in amount_strategy(), b in amount_strategy()) {
        let x = Money::new(a, "USD").unwrap();
        let y = Money::new(b, "EUR").unwrap();
        let add_is_mismatch = matches!(x.add(&y), Err(Error::CurrencyMismatch { .. }));
        let sub_is_mismatch = matches!(x.sub(&y), Err(Error::CurrencyMismatch { .. }));
        prop_assert!(add_is_mismatch);
        prop_assert!(sub_is_mismatch);
    }

    /// Property: canonical bytes do not depend on map insertion order
    #[test]
    fn prop_canonical_map_order_invariant(entries in metric_map_strategy()) {
        let forward: BTreeMap<String, CanonicalValue> = entries
            .iter()
            .map(|(k, v)| (k.clone(), CanonicalValue::Decimal(*v)))
            .collect();
        let reverse: BTreeMap<String, CanonicalValue> = entries
            .iter()
            .rev()
            .map(|(k, v)| (k.clone(), CanonicalValue::Decimal(*v)))
            .collect();

        prop_assert_eq!(
            canonical_bytes(&CanonicalValue::Map(forward)).unwrap(),
            canonical_bytes(&CanonicalValue::Map(reverse)).unwrap()
        );
    }

    /// Property: equal money values canonicalize to identical bytes
    #[test]
    fn prop_canonical_money_deterministic(a in amount_strategy(), ccy in currency_strategy()) {
        let x = Money::new(a, ccy).unwrap();
        let y = Money::new(a, ccy).unwrap();
        prop_assert_eq!(
            canonical_bytes(&x.to_canonical().unwrap()).unwrap(),
            canonical_bytes(&y.to_canonical().unwrap()).unwrap()
        );
    }

    /// Property: the quoted factory only ever yields bid <= ask
    #[test]
    fn prop_quoted_spread_never_negative(bid in amount_strategy(), ask in amount_strategy()) {
        match Quoted::new(bid, ask, "ICE", None, QuoteCondition::Indicative) {
            Ok(quote) => {
                prop_assert!(quote.bid() <= quote.ask());
                prop_assert!(quote.spread().unwrap() >= Decimal::ZERO);
            }
            Err(_) => prop_assert!(bid > ask),
        }
    }

    /// Property: same value, different sources -> same content hash,
    /// different identity hash
    #[test]
    fn prop_identity_separates_sources(a in amount_strategy()) {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let value = Money::new(a, "USD").unwrap();

        let first = Attestation::new(
            value.clone(),
            Confidence::Firm(Firm::new("NYSE", ts, "t-1").unwrap()),
            "NYSE",
            ts,
            vec![],
        )
        .unwrap();
        let second = Attestation::new(
            value,
            Confidence::Firm(Firm::new("ICE", ts, "t-1").unwrap()),
            "ICE",
            ts,
            vec![],
        )
        .unwrap();

        prop_assert_eq!(first.content_hash(), second.content_hash());
        prop_assert_ne!(first.identity_hash(), second.identity_hash());
    }
}
