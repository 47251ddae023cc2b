//! Integration tests for command scripts and catalogs

use circuit_grid::{
    parse, run, run_with_config, Catalog, CatalogError, Command, ExpansionState, GateCatalog,
    GridSpec, LayoutError, Outcome, RunConfig, RunError, ScriptError,
};

#[test]
fn test_full_session() {
    let script = r#"
        # Bell pair with a neighbour on each track
        insert BELL 0 0 as bell
        insert H 1 0
        insert X 1 2
        expand bell
        check
    "#;

    let report = run(script).expect("Should run");
    insta::assert_snapshot!(report.snapshot.to_string().trim_end(), @r"
    q0: H    CNOT H    .    .    .    .    .    .    .
    q1: ~    |    .    .    .    .    .    .    .    .
    q2: .    .    X    .    .    .    .    .    .    .
    ");
}

#[test]
fn test_collapse_restores_grid() {
    let expanded = run("insert BELL 0 0 as b\ninsert H 1 0\nexpand b\n").unwrap();
    let collapsed = run("insert BELL 0 0 as b\ninsert H 1 0\nexpand b\ncollapse b\n").unwrap();
    let untouched = run("insert BELL 0 0 as b\ninsert H 1 0\n").unwrap();

    assert_ne!(expanded.snapshot, untouched.snapshot);
    assert_eq!(collapsed.snapshot, untouched.snapshot);
}

#[test]
fn test_aliases_and_ids() {
    let report = run("drop CNOT 0 0\ndrag g1 5 1\nshow\n").unwrap();
    assert!(matches!(
        report.outcomes[1],
        Outcome::Moved { to, .. } if to.x == 5 && to.y == 1
    ));
    assert!(matches!(report.outcomes[2], Outcome::Shown(_)));
}

#[test]
fn test_blocked_expansion_is_reported() {
    let config = RunConfig::new()
        .with_grid(GridSpec::new(2, 3).unwrap())
        .with_keep_going(true);
    let report = run_with_config("insert QFT2 0 0 as q\nexpand q\ntoggle q\n", config).unwrap();

    let rejections: Vec<&ScriptError> = report.rejections().collect();
    assert_eq!(rejections.len(), 2);
    for err in rejections {
        assert!(matches!(
            err,
            ScriptError::Rejected {
                source: LayoutError::Blocked { .. },
                ..
            }
        ));
    }
    assert_eq!(report.snapshot.entries[0].state, ExpansionState::Collapsed);
}

#[test]
fn test_stops_at_first_refusal() {
    let err = run("insert H 0 0\ninsert H 0 0\ninsert H 1 0\n").unwrap_err();
    match err {
        RunError::Script(ScriptError::Rejected { span, source, .. }) => {
            assert_eq!(span, 20..21);
            assert!(matches!(source, LayoutError::Overlap { .. }));
        }
        other => panic!("Expected rejection, got {:?}", other),
    }
}

#[test]
fn test_all_parse_errors_reported() {
    let err = run("insert\nmove g1\nshow\nexpand 3\n").unwrap_err();
    assert_eq!(err.script_errors().len(), 3);
}

#[test]
fn test_parse_keeps_spans() {
    let commands = parse("show\ncollapse pair\n").unwrap();
    assert_eq!(commands[0].span, 0..4);
    assert_eq!(commands[1].span, 5..18);
    assert!(matches!(commands[1].node, Command::Collapse(_)));
}

#[test]
fn test_custom_catalog_from_toml() {
    let catalog = GateCatalog::from_str(
        r#"
        [[gate]]
        id = "U"

        [[gate]]
        id = "ADDER"
        height = 3
        expandable = true
        components = [
            { gate = "U", x = 4, y = 0 },
            { gate = "U", x = 5, y = 2 },
        ]
        "#,
    )
    .expect("Should load");
    assert_eq!(catalog.gate_types(), vec!["ADDER", "U"]);

    let config = RunConfig::new().with_catalog(catalog);
    let report = run_with_config("insert ADDER 0 0 as a\ninsert U 1 1\nexpand a\n", config).unwrap();
    // ADDER spans two columns once expanded, so U moves over by one
    let u = report.snapshot.entries.iter().find(|e| e.gate.gate_type == "U").unwrap();
    assert_eq!((u.gate.x, u.gate.y), (2, 1));
}

#[test]
fn test_catalog_rejects_duplicates() {
    let err = GateCatalog::from_str("[[gate]]\nid = \"H\"\n\n[[gate]]\nid = \"H\"\n").unwrap_err();
    assert!(matches!(err, CatalogError::Duplicate(ref id) if id == "H"));
}

#[test]
fn test_catalog_from_file() {
    let path = std::env::temp_dir().join(format!("circuit-grid-catalog-{}.toml", std::process::id()));
    std::fs::write(&path, "[[gate]]\nid = \"RZ\"\n").unwrap();
    let catalog = GateCatalog::from_file(&path);
    std::fs::remove_file(&path).ok();

    let catalog = catalog.expect("Should load");
    assert!(catalog.definition_of("RZ").is_some());
    assert!(catalog.definition_of("H").is_none());
}

#[test]
fn test_missing_catalog_file() {
    let err = GateCatalog::from_file(std::path::Path::new("/nonexistent/catalog.toml")).unwrap_err();
    assert!(matches!(err, CatalogError::IoError(_)));
}

#[test]
fn test_error_report_points_at_gate_type() {
    let source = "insert HADAMARD 0 0\n";
    let err = run(source).unwrap_err();
    let formatted = err.script_errors()[0].format(source, "session.grid");
    assert!(formatted.contains("unknown gate type 'HADAMARD'"));
    assert!(formatted.contains("session.grid"));
}
