//! End-to-end persistence tests
//!
//! Exercise the full flow: construct attestations, store them
//! idempotently, append ledger transactions through the single writer,
//! publish notifications, and walk provenance back to its terminal firm
//! observation.

use attest_core::{
    Attestation, CanonicalValue, Confidence, Derived, Firm, IdentityHash, Money, PositiveAmount,
    TransactionRef,
};
use chrono::{DateTime, TimeZone, Utc};
use fact_store::{
    spawn_log_writer, AttestationStore, BitemporalEnvelope, EventBus, LogEvent,
    MemoryAttestationStore, MemoryEventBus, MemoryStateStore, StateStore, StoreConfig, Topic,
    walk_provenance,
};
use ledger_kit::{AccountId, Move, Transaction};
use rust_decimal_macros::dec;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

fn ts(minute: u32) -> DateTime<Utc> {
    // Subscriber may already be set by a parallel test; ignore the race
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    Utc.with_ymd_and_hms(2026, 3, 1, 12, minute, 0).unwrap()
}

fn firm_attestation(amount: rust_decimal::Decimal, source: &str) -> Attestation<Money> {
    Attestation::new(
        Money::new(amount, "USD").unwrap(),
        Confidence::Firm(Firm::new(source, ts(0), "obs-1").unwrap()),
        source,
        ts(0),
        vec![],
    )
    .unwrap()
}

fn derived_attestation(
    amount: rust_decimal::Decimal,
    source: &str,
    provenance: Vec<IdentityHash>,
) -> Attestation<Money> {
    Attestation::new(
        Money::new(amount, "USD").unwrap(),
        Confidence::Derived(
            Derived::new(
                "curve-interp",
                "cfg-7",
                BTreeMap::from([("rmse".to_string(), dec!(0.015))]),
                Some((dec!(99.5), dec!(100.5))),
                Some(dec!(0.95)),
            )
            .unwrap(),
        ),
        source,
        ts(1),
        provenance,
    )
    .unwrap()
}

#[tokio::test]
async fn test_store_idempotency_under_concurrent_writers() {
    let store = Arc::new(MemoryAttestationStore::new());
    let record = firm_attestation(dec!(101.25), "NYSE")
        .into_record(ts(0), ts(0))
        .unwrap();

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let store = store.clone();
        let record = record.clone();
        tasks.push(tokio::spawn(async move { store.store(record).await }));
    }

    let mut hashes = Vec::new();
    for task in tasks {
        hashes.push(task.await.unwrap().unwrap());
    }

    // Every concurrent store converged on the same identity hash
    assert!(hashes.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_same_value_from_two_sources_never_collides() {
    let store = MemoryAttestationStore::new();

    let nyse = firm_attestation(dec!(101.25), "NYSE");
    let ice = firm_attestation(dec!(101.25), "ICE");
    assert_eq!(nyse.content_hash(), ice.content_hash());

    let id_nyse = store
        .store(nyse.into_record(ts(0), ts(0)).unwrap())
        .await
        .unwrap();
    let id_ice = store
        .store(ice.into_record(ts(0), ts(0)).unwrap())
        .await
        .unwrap();

    assert_ne!(id_nyse, id_ice);
    assert_eq!(store.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_provenance_chain_terminates_at_firm() {
    let store = MemoryAttestationStore::new();

    let firm = store
        .store(
            firm_attestation(dec!(100.00), "NYSE")
                .into_record(ts(0), ts(0))
                .unwrap(),
        )
        .await
        .unwrap();
    let derived1 = store
        .store(
            derived_attestation(dec!(100.40), "pricing-svc", vec![firm])
                .into_record(ts(1), ts(1))
                .unwrap(),
        )
        .await
        .unwrap();
    let derived2 = store
        .store(
            derived_attestation(dec!(100.80), "risk-svc", vec![derived1])
                .into_record(ts(2), ts(2))
                .unwrap(),
        )
        .await
        .unwrap();

    let lineage = walk_provenance(&store, &derived2).await.unwrap();
    assert_eq!(lineage.len(), 3);
    assert_eq!(lineage[0].identity_hash, derived2);
    assert_eq!(lineage[1].identity_hash, derived1);
    assert_eq!(lineage[2].identity_hash, firm);
    assert!(lineage[2].provenance.is_empty());
}

#[tokio::test]
async fn test_transaction_through_single_writer_with_notifications() {
    let handle = spawn_log_writer(
        fact_store::MemoryTransactionLog::new(),
        &StoreConfig::default(),
    );
    let bus = MemoryEventBus::new();
    bus.subscribe(Topic::TransactionApplied, "risk-workers")
        .await
        .unwrap();

    let tx = Transaction::new(
        TransactionRef::new("T-2026-0001").unwrap(),
        vec![Move::new(
            AccountId::new("BOOK-TRADING").unwrap(),
            AccountId::new("BOOK-SETTLEMENT").unwrap(),
            "USD",
            PositiveAmount::new(dec!(500.00)).unwrap(),
            TransactionRef::new("CTR-77").unwrap(),
        )
        .unwrap()],
        ts(3),
    )
    .unwrap();
    tx.conservation_check().unwrap();

    // Append the applied transaction to the log through the one writer
    let payload = CanonicalValue::record(
        "transaction.applied",
        [(
            "transaction",
            CanonicalValue::Text(tx.id().as_str().to_string()),
        )],
    );
    let key = Uuid::new_v4();
    handle
        .append(BitemporalEnvelope::new(
            LogEvent {
                event_type: "transaction.applied".to_string(),
                payload: payload.clone(),
                idempotency_key: key,
                origin: None,
            },
            ts(3),
            ts(3),
        ))
        .await
        .unwrap();

    // Safe retry with the same idempotency key
    handle
        .append(BitemporalEnvelope::new(
            LogEvent {
                event_type: "transaction.applied".to_string(),
                payload,
                idempotency_key: key,
                origin: None,
            },
            ts(3),
            ts(3),
        ))
        .await
        .unwrap();

    let records = handle.replay().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].envelope.payload.event_type, "transaction.applied");

    let notification = serde_json::to_vec(&records[0]).unwrap();
    bus.publish(Topic::TransactionApplied, tx.id().as_str(), &notification)
        .await
        .unwrap();

    let seen = bus.published(Topic::TransactionApplied);
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].key, "T-2026-0001");
    assert_eq!(seen[0].payload, notification);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_checkpoint_offsets_survive_in_state_store() {
    let state = MemoryStateStore::new();

    assert_eq!(state.get("offset.risk-workers").await.unwrap(), None);
    state
        .put("offset.risk-workers", b"17".to_vec())
        .await
        .unwrap();
    assert_eq!(
        state.get("offset.risk-workers").await.unwrap(),
        Some(b"17".to_vec())
    );
}

#[tokio::test]
async fn test_ledger_entry_attested_and_stored() {
    use ledger_kit::{DistinctAccountPair, LedgerEntry};

    let store = MemoryAttestationStore::new();

    // Quote attestation backs the entry
    let quote = store
        .store(
            firm_attestation(dec!(250.00), "LSE")
                .into_record(ts(0), ts(0))
                .unwrap(),
        )
        .await
        .unwrap();

    let entry = LedgerEntry::new(
        DistinctAccountPair::new(
            AccountId::new("BOOK-TRADING").unwrap(),
            AccountId::new("BOOK-SETTLEMENT").unwrap(),
        )
        .unwrap(),
        attest_core::SecurityId::new("US0378331005").unwrap(),
        PositiveAmount::new(dec!(250.00)).unwrap(),
        ts(4),
        Some(quote),
    );

    // The entry itself is attestable and storable
    let entry_attestation = Attestation::new(
        entry,
        Confidence::Firm(Firm::new("ledger-svc", ts(4), "post-1").unwrap()),
        "ledger-svc",
        ts(4),
        vec![quote],
    )
    .unwrap();
    let id = store
        .store(entry_attestation.into_record(ts(4), ts(4)).unwrap())
        .await
        .unwrap();

    let lineage = walk_provenance(&store, &id).await.unwrap();
    assert_eq!(lineage.len(), 2);
    assert_eq!(lineage[1].identity_hash, quote);
}
