// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! LIST predicates
//!
//! Filters are serialized into the LIST request metadata as a small tagged
//! map. One predicate exists today: a structural-superset check on document
//! content.

use serde_json::{Map, Value};

/// Predicate applied server-side to the documents of a LIST.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    /// Selects documents whose content is a structural superset of `sub`,
    /// compared recursively down to `level` nestings. A level of 0 compares
    /// only the top value; a negative level means unbounded depth.
    SuperOf { sub: Value, level: i32 },
}

impl Filter {
    /// Shallow superset check (level 0).
    pub fn super_of(sub: Value) -> Self {
        Self::super_of_at(sub, 0)
    }

    pub fn super_of_at(sub: Value, level: i32) -> Self {
        Filter::SuperOf { sub, level }
    }

    /// Type tag carried in the encoded map's `_t` field.
    pub fn tag(&self) -> &'static str {
        match self {
            Filter::SuperOf { .. } => "so",
        }
    }

    /// Encode into LIST request metadata.
    pub fn encode(&self) -> Value {
        match self {
            Filter::SuperOf { sub, level } => {
                let mut map = Map::new();
                map.insert("_t".to_string(), Value::from(self.tag()));
                map.insert("s".to_string(), sub.clone());
                map.insert("l".to_string(), Value::from(*level));
                Value::Object(map)
            }
        }
    }

    /// Decode from an encoded map. A missing or unrecognized tag means
    /// "no filter", not an error; a missing level defaults to 0.
    pub fn parse(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        match map.get("_t").and_then(Value::as_str)? {
            "so" => Some(Filter::SuperOf {
                sub: map.get("s").cloned().unwrap_or(Value::Null),
                level: map.get("l").and_then(Value::as_i64).unwrap_or(0) as i32,
            }),
            _ => None,
        }
    }
}
