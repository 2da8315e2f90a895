use serde_json::{Value, json};

use crate::{Manifest, ManifestIndex};

pub mod index;

/// Token ledger: persistent supply/balances, a seeding routine and a
/// transfer event.
pub(crate) fn ledger_json() -> Value {
    json!({
        "syntax": 1,
        "engine": {"kind": "PISA", "flags": []},
        "elements": [
            {
                "ptr": 0,
                "kind": "state",
                "data": {
                    "mode": "persistent",
                    "fields": [
                        {"slot": 0, "label": "symbol", "type": "string"},
                        {"slot": 1, "label": "supply", "type": "u64"},
                        {"slot": 2, "label": "balances", "type": "map[address]u64"}
                    ]
                }
            },
            {
                "ptr": 1,
                "kind": "routine",
                "deps": [0],
                "data": {
                    "name": "Seed",
                    "kind": "deploy",
                    "mode": "persistent",
                    "accepts": [
                        {"slot": 1, "label": "supply", "type": "u64"},
                        {"slot": 0, "label": "symbol", "type": "string"}
                    ],
                    "returns": null,
                    "executes": {"hex": "0x"},
                    "catches": null
                }
            },
            {
                "ptr": 2,
                "kind": "routine",
                "deps": [0],
                "data": {
                    "name": "BalanceOf",
                    "kind": "invoke",
                    "mode": "readonly",
                    "accepts": [{"slot": 0, "label": "addr", "type": "address"}],
                    "returns": [{"slot": 0, "label": "balance", "type": "u64"}],
                    "executes": {"hex": "0x"},
                    "catches": []
                }
            },
            {
                "ptr": 3,
                "kind": "event",
                "data": {
                    "name": "Transfer",
                    "topics": 1,
                    "fields": [
                        {"slot": 0, "label": "sender", "type": "address"},
                        {"slot": 1, "label": "receiver", "type": "address"},
                        {"slot": 2, "label": "amount", "type": "u64"}
                    ]
                }
            }
        ]
    })
}

/// Registry of people: classes, nested collections and an ephemeral state.
pub(crate) fn registry_json() -> Value {
    json!({
        "syntax": 1,
        "engine": {"kind": "PISA", "flags": null},
        "elements": [
            {
                "ptr": 0,
                "kind": "class",
                "data": {
                    "name": "Person",
                    "fields": [
                        {"slot": 0, "label": "name", "type": "string"},
                        {"slot": 1, "label": "age", "type": "u64"},
                        {"slot": 2, "label": "tags", "type": "[]string"}
                    ],
                    "methods": [{"ptr": 4, "code": 0}]
                }
            },
            {
                "ptr": 1,
                "kind": "state",
                "deps": [0],
                "data": {
                    "mode": "persistent",
                    "fields": [
                        {"slot": 0, "label": "people", "type": "map[string]class.Person"},
                        {"slot": 1, "label": "queue", "type": "[]Person"},
                        {"slot": 2, "label": "owner", "type": "Person"},
                        {"slot": 3, "label": "grid", "type": "[4][]u64"}
                    ]
                }
            },
            {
                "ptr": 2,
                "kind": "state",
                "data": {
                    "mode": "ephemeral",
                    "fields": [
                        {"slot": 0, "label": "spent", "type": "map[string]u64"}
                    ]
                }
            },
            {
                "ptr": 3,
                "kind": "routine",
                "deps": [0, 1],
                "data": {
                    "name": "Register",
                    "kind": "invoke",
                    "accepts": [
                        {"slot": 0, "label": "person", "type": "Person"},
                        {"slot": 1, "label": "friends", "type": "[]Person"},
                        {"slot": 2, "label": "key", "type": "bytes"}
                    ],
                    "returns": []
                }
            },
            {
                "ptr": 4,
                "kind": "method",
                "deps": [0],
                "data": {
                    "name": "Greet",
                    "class": "Person",
                    "mutable": false,
                    "accepts": [{"slot": 0, "label": "self", "type": "ptr"}],
                    "returns": [{"slot": 0, "label": "greeting", "type": "string"}]
                }
            }
        ]
    })
}

pub(crate) fn manifest(json: Value) -> Manifest {
    Manifest::from_value(json).expect("fixture manifest")
}

pub(crate) fn index(json: Value) -> ManifestIndex {
    ManifestIndex::from(&manifest(json))
}
