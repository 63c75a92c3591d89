// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Client for a remote hierarchical document store.
//!
//! A docstore holds structured documents inside nested collections,
//! addressed by slash-delimited paths. This crate opens one persistent
//! connection to a server, exchanges line-delimited request/response
//! messages correlated by an id, and exposes a typed, parent-linked handle
//! hierarchy (absent / document / collection) that callers navigate and
//! mutate.
//!
//! Entry point: [`connect`] performs the VERIFY handshake and returns a
//! ready [`Database`], or `None` when the transport cannot be opened or the
//! server refuses the credentials.

pub mod conn;
pub mod error;
pub mod file;
pub mod transport;

pub use conn::{
    connect, connect_with, ConnectOptions, Database, DEFAULT_MAX_FAILURES, DEFAULT_READ_TIMEOUT,
};
pub use error::OperationError;
pub use file::{AbsentFile, Collection, Document, File};
pub use transport::{LineTransport, TcpLineTransport};

// Wire vocabulary shared with the protocol crate.
pub use docstore_proto::{FileKind, Filter};
