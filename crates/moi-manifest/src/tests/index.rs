use serde_json::json;

use super::{index, ledger_json, registry_json};
use crate::{ElementKind, ManifestError, ManifestIndex, RoutineKind, StateMode};

#[test]
fn routines_events_and_states_are_indexed() {
    let index = index(ledger_json());
    assert_eq!(index.len(), 4);

    let def = index.routine_def("BalanceOf").expect("routine def");
    assert_eq!(def.ptr, 2);
    assert_eq!(def.kind, RoutineKind::Invoke);
    assert_eq!(index.routine("Seed").expect("seed").accepts.len(), 2);

    assert_eq!(index.event_def("Transfer").expect("event").topics, 1);
    assert!(index.states().has(StateMode::Persistent));
    assert!(!index.states().has(StateMode::Ephemeral));
    assert_eq!(index.state(StateMode::Persistent).expect("state").fields.len(), 3);
}

#[test]
fn unknown_names_report_kind() {
    let index = index(ledger_json());
    let err = index.routine("Mint").unwrap_err();
    assert!(matches!(
        err,
        ManifestError::NotFound { kind: ElementKind::Routine, ref name } if name == "Mint"
    ));
    assert_eq!(err.to_string(), "routine 'Mint' not found");

    assert!(matches!(
        index.state(StateMode::Ephemeral),
        Err(ManifestError::NotFound {
            kind: ElementKind::State,
            ..
        })
    ));
    assert!(matches!(
        index.element(99),
        Err(ManifestError::UnknownElement(99))
    ));
}

#[test]
fn classes_resolve_with_or_without_prefix() {
    let index = index(registry_json());
    assert_eq!(index.class("Person").expect("bare").name, "Person");
    assert_eq!(index.class("class.Person").expect("prefixed").fields.len(), 3);
    assert!(index.class("Animal").is_err());
}

#[test]
fn methods_are_bound_to_their_class() {
    let index = index(registry_json());
    let def = index.method_def("Greet").expect("method");
    assert_eq!(def.class, "Person");
    let methods = index.class_methods("class.Person");
    assert_eq!(methods.len(), 1);
    assert_eq!(methods[0].name, "Greet");
    assert!(index.class_methods("Animal").is_empty());
}

#[test]
fn duplicate_names_keep_the_last_definition() {
    let manifest = super::manifest(json!({
        "syntax": 1,
        "engine": {"kind": "PISA", "flags": []},
        "elements": [
            {"ptr": 0, "kind": "event", "data": {"name": "Ping", "topics": 0, "fields": []}},
            {"ptr": 1, "kind": "event", "data": {"name": "Ping", "topics": 2, "fields": []}}
        ]
    }));
    let index = ManifestIndex::from(&manifest);
    let def = index.event_def("Ping").expect("event");
    assert_eq!(def.ptr, 1);
    assert_eq!(def.topics, 2);
    assert_eq!(index.len(), 2);
}

#[test]
fn kind_mismatch_is_reported() {
    let manifest = super::manifest(json!({
        "syntax": 1,
        "engine": {"kind": "PISA", "flags": []},
        "elements": [
            {"ptr": 0, "kind": "routine", "data": {"name": "Run", "kind": "invoke"}},
            {"ptr": 0, "kind": "constant", "data": {"type": "u64", "value": "0x03"}}
        ]
    }));
    let index = ManifestIndex::from(&manifest);
    assert!(matches!(
        index.routine("Run"),
        Err(ManifestError::KindMismatch {
            ptr: 0,
            expected: ElementKind::Routine,
            found: ElementKind::Constant,
        })
    ));
}
