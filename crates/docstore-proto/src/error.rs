// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Error types for the wire codec

use thiserror::Error;

/// Failure to decode an inbound request line.
///
/// Requests are parsed by servers and by test transports; the client side
/// only encodes them.
#[derive(Debug, Error)]
pub enum RequestParseError {
    #[error("request line is not valid text form: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("request line is not a map")]
    NotAMap,
    #[error("request id is missing or negative")]
    InvalidId,
    #[error("unknown function code '{0}'")]
    UnknownFunction(String),
}

/// Failure to decode a response line.
#[derive(Debug, Error)]
pub enum ResponseParseError {
    #[error("response line is not valid text form: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("response line is not a map")]
    NotAMap,
    #[error("response id is missing or negative")]
    InvalidId,
}
