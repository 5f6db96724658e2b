//! Provenance resolution
//!
//! Provenance is an ordered list of identity-hash references resolved
//! against the store, not in-memory pointers; that keeps attestations
//! serializable and the lineage walkable from any process.

use crate::error::Result;
use crate::store::AttestationStore;
use attest_core::{AttestationRecord, IdentityHash};
use std::collections::{HashSet, VecDeque};

/// Resolve the full ancestry of an attestation, head first
///
/// Walks breadth-first through the store: the head record, then its
/// provenance in order, then theirs, terminating at records with empty
/// provenance. Shared ancestors are visited once. A missing link
/// surfaces as the store's `NotFound` failure.
pub async fn walk_provenance<S>(store: &S, head: &IdentityHash) -> Result<Vec<AttestationRecord>>
where
    S: AttestationStore + ?Sized,
{
    let mut visited: HashSet<IdentityHash> = HashSet::new();
    let mut queue: VecDeque<IdentityHash> = VecDeque::from([*head]);
    let mut lineage = Vec::new();

    while let Some(id) = queue.pop_front() {
        if !visited.insert(id) {
            continue;
        }
        let record = store.retrieve(&id).await?;
        queue.extend(record.provenance.iter().copied());
        lineage.push(record);
    }

    Ok(lineage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryAttestationStore;
    use attest_core::{Attestation, Confidence, Derived, Firm, Money};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn ts() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn firm_confidence(source: &str) -> Confidence {
        Confidence::Firm(Firm::new(source, ts(), "obs-1").unwrap())
    }

    fn derived_confidence() -> Confidence {
        Confidence::Derived(
            Derived::new(
                "curve-interp",
                "cfg-7",
                BTreeMap::from([("rmse".to_string(), dec!(0.01))]),
                None,
                None,
            )
            .unwrap(),
        )
    }

    async fn store_attestation(
        store: &MemoryAttestationStore,
        amount: rust_decimal::Decimal,
        confidence: Confidence,
        source: &str,
        provenance: Vec<IdentityHash>,
    ) -> IdentityHash {
        let record = Attestation::new(
            Money::new(amount, "USD").unwrap(),
            confidence,
            source,
            ts(),
            provenance,
        )
        .unwrap()
        .into_record(ts(), ts())
        .unwrap();
        store.store(record).await.unwrap()
    }

    #[tokio::test]
    async fn test_lineage_resolves_to_terminal_firm() {
        let store = MemoryAttestationStore::new();

        let firm =
            store_attestation(&store, dec!(100), firm_confidence("NYSE"), "NYSE", vec![]).await;
        let derived1 = store_attestation(
            &store,
            dec!(100.5),
            derived_confidence(),
            "pricing-svc",
            vec![firm],
        )
        .await;
        let derived2 = store_attestation(
            &store,
            dec!(101),
            derived_confidence(),
            "risk-svc",
            vec![derived1],
        )
        .await;

        let lineage = walk_provenance(&store, &derived2).await.unwrap();
        assert_eq!(lineage.len(), 3);
        assert_eq!(lineage[0].identity_hash, derived2);
        assert_eq!(lineage[1].identity_hash, derived1);
        assert_eq!(lineage[2].identity_hash, firm);
        assert!(lineage[2].provenance.is_empty());
    }

    #[tokio::test]
    async fn test_shared_ancestor_visited_once() {
        let store = MemoryAttestationStore::new();

        let root =
            store_attestation(&store, dec!(1), firm_confidence("NYSE"), "NYSE", vec![]).await;
        let left =
            store_attestation(&store, dec!(2), derived_confidence(), "svc-a", vec![root]).await;
        let right =
            store_attestation(&store, dec!(3), derived_confidence(), "svc-b", vec![root]).await;
        let head = store_attestation(
            &store,
            dec!(4),
            derived_confidence(),
            "svc-c",
            vec![left, right],
        )
        .await;

        let lineage = walk_provenance(&store, &head).await.unwrap();
        assert_eq!(lineage.len(), 4);
        let roots = lineage
            .iter()
            .filter(|r| r.identity_hash == root)
            .count();
        assert_eq!(roots, 1);
    }

    #[tokio::test]
    async fn test_missing_link_is_not_found() {
        let store = MemoryAttestationStore::new();
        let phantom = IdentityHash::from_bytes([3u8; 32]);
        let head = store_attestation(
            &store,
            dec!(9),
            derived_confidence(),
            "svc-a",
            vec![phantom],
        )
        .await;

        let result = walk_provenance(&store, &head).await;
        assert!(matches!(result, Err(crate::error::Error::NotFound(_))));
    }
}
