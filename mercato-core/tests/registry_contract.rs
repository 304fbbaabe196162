use mercato_core::{AppConfig, IndexCode, MercatoError, Namespace, SymbolRegistry};

fn default_registry() -> SymbolRegistry {
    let cfg = AppConfig::load(concat!(env!("CARGO_MANIFEST_DIR"), "/../config.yaml"))
        .expect("workspace config.yaml loads");
    SymbolRegistry::from_config(&cfg.symbols).expect("workspace config.yaml is consistent")
}

#[test]
fn forward_namespaces_cover_the_whole_universe() {
    let reg = default_registry();
    for code in reg.codes() {
        for ns in [
            Namespace::Yahoo,
            Namespace::TradingView,
            Namespace::InvestingSlug,
        ] {
            assert!(
                !reg.resolve(code, ns).unwrap().is_empty(),
                "{code} resolves to an empty symbol in {ns}"
            );
        }
    }
}

#[test]
fn unknown_lookups_fail_and_never_default() {
    let reg = default_registry();

    // A label outside the configured vocabulary.
    match reg.resolve_label("Hang Seng") {
        Err(MercatoError::LookupMiss { what }) => assert!(what.contains("Hang Seng")),
        other => panic!("expected a lookup miss, got {other:?}"),
    }
}

#[test]
fn lookups_are_stable_regardless_of_call_order() {
    let reg = default_registry();

    let before: Vec<IndexCode> = reg.codes().collect();
    // Interleave lookups of every flavor, then re-enumerate.
    let spx = reg.resolve(IndexCode::Spx500, Namespace::Yahoo).unwrap().to_string();
    let _ = reg.resolve_label("DAX").unwrap();
    let _ = reg.resolve(IndexCode::Uk100, Namespace::InvestingSlug).unwrap();
    let after: Vec<IndexCode> = reg.codes().collect();

    assert_eq!(before, after);
    assert_eq!(reg.resolve(IndexCode::Spx500, Namespace::Yahoo).unwrap(), spx);
}

#[test]
fn label_namespace_composes_with_slug_namespace() {
    let reg = default_registry();
    let code = reg.resolve_label("Nikkei 225").unwrap();
    assert_eq!(code, IndexCode::Jpn225);
    assert_eq!(reg.resolve(code, Namespace::InvestingSlug).unwrap(), "japan-ni225");
}

#[test]
fn registry_is_shareable_across_tasks() {
    // Read-only after construction; lookups from concurrent tasks need no
    // synchronization beyond the Arc.
    let reg = std::sync::Arc::new(default_registry());
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let mut handles = Vec::new();
        for code in IndexCode::ALL {
            let reg = std::sync::Arc::clone(&reg);
            handles.push(tokio::spawn(async move {
                reg.resolve(code, Namespace::Yahoo).map(str::to_owned)
            }));
        }
        for h in handles {
            assert!(h.await.unwrap().is_ok());
        }
    });
}
