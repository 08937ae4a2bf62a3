//! Both reference adapters pass every scenario

use kvharness::storage::{EmbeddedEngine, EngineKind, OrderedStore, ShardedStore};
use kvharness::{
    BackendUnavailable, ConformanceConfig, ConformanceSuite, Outcome, Scenario, StoreClient,
};

#[test]
fn test_ordered_store_conformant() {
    let report =
        ConformanceSuite::default().run(|| Ok::<_, BackendUnavailable>(OrderedStore::new()));
    report.assert_conformant();
    assert_eq!(report.passed(), 6);
    assert!(!report.is_inconclusive());
}

#[test]
fn test_sharded_store_conformant() {
    let report =
        ConformanceSuite::default().run(|| Ok::<_, BackendUnavailable>(ShardedStore::new()));
    report.assert_conformant();
    assert_eq!(report.backend(), "sharded");
    assert_eq!(report.passed(), 6);
}

#[test]
fn test_boxed_clients_conformant() {
    let mut next = 0;
    let report = ConformanceSuite::default().run(|| {
        next += 1;
        let client: Box<dyn StoreClient> = if next % 2 == 0 {
            Box::new(OrderedStore::new())
        } else {
            Box::new(ShardedStore::new())
        };
        Ok::<_, BackendUnavailable>(client)
    });
    report.assert_conformant();
    assert_eq!(next, 6);
}

#[test]
fn test_embedded_engines_conformant() {
    for kind in [EngineKind::Ordered, EngineKind::Sharded] {
        let engine = EmbeddedEngine::new(kind);
        let report =
            ConformanceSuite::default().run_with_launcher(&engine, |handle| handle.connect());
        report.assert_conformant();
        assert_eq!(report.backend(), kind.as_str());
        assert_eq!(report.passed(), 6);
    }
}

#[test]
fn test_single_store_shared_across_scenarios() {
    // Every scenario gets a new client handle onto the same data
    let store = OrderedStore::new();
    let report = ConformanceSuite::default().run(|| Ok::<_, BackendUnavailable>(store.clone()));
    report.assert_conformant();

    // The update record and the scan records are left behind
    assert_eq!(store.table_len("test"), 101);
    assert_eq!(store.table_len("test_edges"), 3);
}

#[test]
fn test_custom_config_conformant() {
    let config = ConformanceConfig::from_toml_str(
        r#"
table = "usertable"
field = "field0"
key_width = 8
scan_records = 500
scan_start = 480
scan_count = 20
"#,
    )
    .unwrap();

    let report =
        ConformanceSuite::new(config).run(|| Ok::<_, BackendUnavailable>(ShardedStore::new()));
    report.assert_conformant();
    assert_eq!(report.passed(), 6);
}

#[test]
fn test_canonical_only() {
    let config = ConformanceConfig {
        extended: false,
        ..ConformanceConfig::default()
    };
    let report =
        ConformanceSuite::new(config).run(|| Ok::<_, BackendUnavailable>(OrderedStore::new()));

    let ran: Vec<Scenario> = report.results().iter().map(|r| r.scenario).collect();
    assert_eq!(ran, Scenario::CANONICAL.to_vec());
    assert!(report.results().iter().all(|r| r.outcome == Outcome::Passed));
}
