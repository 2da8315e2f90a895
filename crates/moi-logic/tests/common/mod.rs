#![allow(dead_code)]

use std::collections::HashMap;
use std::io;

use moi_logic::{LogicDescriptor, StorageReader};
use moi_state::StorageKey;
use serde_json::json;

pub const SENDER: &str = "b90f39fcf346ba3260518669495f5d368a8d1bb8023584f67e8a5671cf3c56ce";
pub const RECEIVER: &str = "190f39fcf346ba3260518669495f5d368a8d1bb8023584f67e8a5671cf3c56ce";

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn unhex(s: &str) -> Vec<u8> {
    hex::decode(s.trim_start_matches("0x")).expect("hex fixture")
}

pub fn ledger_manifest() -> serde_json::Value {
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
                        {"slot": 0, "label": "symbol", "type": "string"},
                        {"slot": 1, "label": "supply", "type": "u64"}
                    ],
                    "returns": [],
                    "executes": {"hex": "0x"},
                    "catches": []
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
                    "topics": 2,
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

pub fn registry_manifest() -> serde_json::Value {
    json!({
        "syntax": 1,
        "engine": {"kind": "PISA", "flags": []},
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
                    ]
                }
            },
            {
                "ptr": 1,
                "kind": "state",
                "deps": [0],
                "data": {
                    "mode": "persistent",
                    "fields": [
                        {"slot": 0, "label": "people", "type": "map[string]Person"},
                        {"slot": 1, "label": "queue", "type": "[]Person"}
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
                    "mode": "persistent",
                    "accepts": [
                        {"slot": 2, "label": "key", "type": "bytes"},
                        {"slot": 0, "label": "person", "type": "Person"},
                        {"slot": 1, "label": "friends", "type": "[]Person"}
                    ],
                    "returns": null
                }
            }
        ]
    })
}

pub fn ledger() -> LogicDescriptor {
    LogicDescriptor::from_json(&ledger_manifest().to_string()).expect("ledger manifest")
}

pub fn registry() -> LogicDescriptor {
    LogicDescriptor::from_json(&registry_manifest().to_string()).expect("registry manifest")
}

/// In-memory storage keyed by storage key and optional participant.
#[derive(Default)]
pub struct MemoryStorage {
    entries: HashMap<(StorageKey, Option<Vec<u8>>), Vec<u8>>,
}

impl MemoryStorage {
    pub fn put(&mut self, key: StorageKey, participant: Option<&[u8]>, bytes: Vec<u8>) {
        self.entries
            .insert((key, participant.map(<[u8]>::to_vec)), bytes);
    }
}

impl StorageReader for MemoryStorage {
    type Error = io::Error;

    fn read(&self, key: &StorageKey, participant: Option<&[u8]>) -> Result<Vec<u8>, Self::Error> {
        Ok(self
            .entries
            .get(&(*key, participant.map(<[u8]>::to_vec)))
            .cloned()
            .unwrap_or_default())
    }
}

pub struct OfflineStorage;

impl StorageReader for OfflineStorage {
    type Error = io::Error;

    fn read(&self, _key: &StorageKey, _participant: Option<&[u8]>) -> Result<Vec<u8>, Self::Error> {
        Err(io::Error::other("storage offline"))
    }
}
