// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Error types for docstore operations

use thiserror::Error;

/// Failure of a domain operation (`get`, `list`, `create`, `delete`,
/// `fetch`, `set`).
///
/// Transport faults never reach this type: handshake faults are absorbed
/// into the `None` return of [`crate::connect`], and in-flight faults are
/// consumed by the retry loop until it yields a failed response.
#[derive(Debug, Error)]
pub enum OperationError {
    /// The server reported an obstacle (`succeed = false`).
    #[error("failed to execute {function} at '{path}'{detail}")]
    Failed {
        function: &'static str,
        path: String,
        detail: String,
    },
    /// A successful response whose payload does not match the shape the
    /// operation expects.
    #[error("invalid result from {function} at '{path}'{detail}")]
    InvalidResult {
        function: &'static str,
        path: String,
        detail: String,
    },
    /// Authorization failures, kept distinct so callers can special-case
    /// access-denied outcomes.
    #[error("permission denied: {0}")]
    PermissionDenied(String),
}

impl OperationError {
    pub(crate) fn failed(
        function: &'static str,
        path: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        OperationError::Failed {
            function,
            path: path.into(),
            detail: detail.into(),
        }
    }

    pub(crate) fn invalid(
        function: &'static str,
        path: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        OperationError::InvalidResult {
            function,
            path: path.into(),
            detail: detail.into(),
        }
    }
}
