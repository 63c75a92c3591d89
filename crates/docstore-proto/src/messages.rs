// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Request/response types for the docstore wire protocol
//!
//! A request is a key-ordered map `{id, f, m?}` and a response is
//! `{id, s?, m?}`, each serialized as one JSON line. A null metadata value is
//! wire-distinct from an empty map: null metadata is omitted from the line
//! entirely.

use std::fmt;

use serde_json::{Map, Value};

use crate::error::{RequestParseError, ResponseParseError};
use crate::filter::Filter;

/// Protocol functions and their short wire codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Function {
    /// query metadata: user, password, database; result metadata: succeed, reason
    Verify,
    /// query metadata: path, filter?; result metadata: documents, collections
    List,
    /// query metadata: path; result metadata: type
    Get,
    /// query metadata: path, type, force?
    Create,
    /// query metadata: path
    Delete,
    /// query metadata: path, data_path; result metadata: the fetched value
    Fetch,
    /// query metadata: path, data_path, data_value
    Set,
    /// closes the socket at the server
    Close,
}

impl Function {
    const ALL: [Function; 8] = [
        Function::Verify,
        Function::List,
        Function::Get,
        Function::Create,
        Function::Delete,
        Function::Fetch,
        Function::Set,
        Function::Close,
    ];

    /// Short code used on the wire.
    pub fn code(self) -> &'static str {
        match self {
            Function::Verify => "v",
            Function::List => "l",
            Function::Get => "g",
            Function::Create => "c",
            Function::Delete => "d",
            Function::Fetch => "f",
            Function::Set => "s",
            Function::Close => "close",
        }
    }

    /// Decode a short code. Matching is case-insensitive.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// File kinds a CREATE request can ask for.
///
/// A closed enum: there is no representable "create an absent file".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    Document,
    Collection,
}

impl FileKind {
    /// Wire value for the CREATE `type` field, also returned by GET.
    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::Document => "document",
            FileKind::Collection => "collection",
        }
    }
}

/// One request, correlated to its response by `id`.
///
/// Ids are assigned by the connection from a strictly increasing counter
/// starting above 0; 0 is reserved for "unknown".
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    id: u64,
    function: Function,
    metadata: Value,
}

impl Request {
    pub fn new(id: u64, function: Function, metadata: Value) -> Self {
        Self {
            id,
            function,
            metadata,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn function(&self) -> Function {
        self.function
    }

    pub fn metadata(&self) -> &Value {
        &self.metadata
    }

    /// Encode as one wire line.
    pub fn encode(&self) -> String {
        let mut map = Map::new();
        map.insert("id".to_string(), Value::from(self.id));
        map.insert("f".to_string(), Value::from(self.function.code()));
        if !self.metadata.is_null() {
            map.insert("m".to_string(), self.metadata.clone());
        }
        Value::Object(map).to_string()
    }

    /// Decode one wire line.
    ///
    /// Missing `m` defaults to null; a missing or negative id and an unknown
    /// function code are errors.
    pub fn parse(line: &str) -> Result<Self, RequestParseError> {
        let value: Value = serde_json::from_str(line)?;
        let map = value.as_object().ok_or(RequestParseError::NotAMap)?;
        let id = map.get("id").and_then(Value::as_i64).unwrap_or(-1);
        if id < 0 {
            return Err(RequestParseError::InvalidId);
        }
        let code = map.get("f").and_then(Value::as_str).unwrap_or("");
        let function = Function::from_code(code)
            .ok_or_else(|| RequestParseError::UnknownFunction(code.to_string()))?;
        let metadata = map.get("m").cloned().unwrap_or(Value::Null);
        Ok(Self {
            id: id as u64,
            function,
            metadata,
        })
    }

    pub fn verify(id: u64, user: &str, password: &str, database: &str) -> Self {
        let mut m = Map::new();
        m.insert("user".to_string(), Value::from(user));
        m.insert("password".to_string(), Value::from(password));
        m.insert("database".to_string(), Value::from(database));
        Self::new(id, Function::Verify, Value::Object(m))
    }

    /// LIST carries the collection path and, when filtering, the encoded filter.
    pub fn list(id: u64, path: &str, filter: Option<&Filter>) -> Self {
        let mut m = Map::new();
        m.insert("path".to_string(), Value::from(path));
        if let Some(filter) = filter {
            m.insert("filter".to_string(), filter.encode());
        }
        Self::new(id, Function::List, Value::Object(m))
    }

    /// GET carries the full file path as scalar metadata.
    pub fn get(id: u64, path: &str) -> Self {
        Self::new(id, Function::Get, Value::from(path))
    }

    /// The `force` key is present only when true.
    pub fn create(id: u64, path: &str, kind: FileKind, force: bool) -> Self {
        let mut m = Map::new();
        m.insert("path".to_string(), Value::from(path));
        m.insert("type".to_string(), Value::from(kind.as_str()));
        if force {
            m.insert("force".to_string(), Value::Bool(true));
        }
        Self::new(id, Function::Create, Value::Object(m))
    }

    /// DELETE carries the full file path as scalar metadata.
    pub fn delete(id: u64, path: &str) -> Self {
        Self::new(id, Function::Delete, Value::from(path))
    }

    pub fn fetch(id: u64, path: &str, data_path: &str) -> Self {
        let mut m = Map::new();
        m.insert("path".to_string(), Value::from(path));
        m.insert("data_path".to_string(), Value::from(data_path));
        Self::new(id, Function::Fetch, Value::Object(m))
    }

    pub fn set(id: u64, path: &str, data_path: &str, data_value: Value) -> Self {
        let mut m = Map::new();
        m.insert("path".to_string(), Value::from(path));
        m.insert("data_path".to_string(), Value::from(data_path));
        m.insert("data_value".to_string(), data_value);
        Self::new(id, Function::Set, Value::Object(m))
    }

    pub fn close(id: u64) -> Self {
        Self::new(id, Function::Close, Value::Null)
    }
}

/// One response. `succeed` is true only when the operation met no obstacle.
#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    id: u64,
    succeed: bool,
    metadata: Value,
}

impl Response {
    pub fn new(id: u64, succeed: bool, metadata: Value) -> Self {
        Self {
            id,
            succeed,
            metadata,
        }
    }

    /// Synthetic failure carrying the originating request's id.
    pub fn failed(id: u64) -> Self {
        Self::new(id, false, Value::Null)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn succeed(&self) -> bool {
        self.succeed
    }

    pub fn metadata(&self) -> &Value {
        &self.metadata
    }

    pub fn into_metadata(self) -> Value {
        self.metadata
    }

    /// Encode as one wire line. `s` appears only on success, `m` only when
    /// there is a payload.
    pub fn encode(&self) -> String {
        let mut map = Map::new();
        map.insert("id".to_string(), Value::from(self.id));
        if self.succeed {
            map.insert("s".to_string(), Value::Bool(true));
        }
        if !self.metadata.is_null() {
            map.insert("m".to_string(), self.metadata.clone());
        }
        Value::Object(map).to_string()
    }

    /// Decode one wire line.
    ///
    /// Absent `s` defaults to false and absent `m` to null; a missing or
    /// negative id is an error.
    pub fn parse(line: &str) -> Result<Self, ResponseParseError> {
        let value: Value = serde_json::from_str(line)?;
        let map = value.as_object().ok_or(ResponseParseError::NotAMap)?;
        let id = map.get("id").and_then(Value::as_i64).unwrap_or(-1);
        if id < 0 {
            return Err(ResponseParseError::InvalidId);
        }
        let succeed = map.get("s").and_then(Value::as_bool).unwrap_or(false);
        let metadata = map.get("m").cloned().unwrap_or(Value::Null);
        Ok(Self {
            id: id as u64,
            succeed,
            metadata,
        })
    }
}
