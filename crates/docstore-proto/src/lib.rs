// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Docstore wire protocol: message types and line codec
//!
//! This crate defines the request/response types exchanged with a docstore
//! server, one message per UTF-8 line. Messages are key-ordered maps in JSON
//! text form; protocol metadata and document content are plain
//! [`serde_json::Value`]s (null / scalar / ordered list / ordered map).

pub mod error;
pub mod filter;
pub mod messages;

pub use error::{RequestParseError, ResponseParseError};
pub use filter::Filter;
pub use messages::{FileKind, Function, Request, Response};
