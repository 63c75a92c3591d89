// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Connection executor and handshake
//!
//! One [`Database`] owns one socket. Requests are executed strictly one at a
//! time: the transport sits behind a mutex, so concurrent callers sharing a
//! connection serialize on it rather than corrupt request/response
//! correlation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use docstore_proto::{FileKind, Request, Response};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::OperationError;
use crate::file::{self, File};
use crate::transport::{LineTransport, TcpLineTransport};

/// Default socket read timeout.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(5000);

/// Default bound on attempts per logical call.
pub const DEFAULT_MAX_FAILURES: u32 = 5;

/// Transport knobs applied once at connection setup.
#[derive(Clone, Debug)]
pub struct ConnectOptions {
    read_timeout: Duration,
    max_failures: u32,
}

impl ConnectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the read timeout applied to the socket.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Override the attempt bound per logical call.
    pub fn max_failures(mut self, max_failures: u32) -> Self {
        self.max_failures = max_failures;
        self
    }
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            read_timeout: DEFAULT_READ_TIMEOUT,
            max_failures: DEFAULT_MAX_FAILURES,
        }
    }
}

/// Open a verified connection to a docstore server.
///
/// Returns `None` when the transport cannot be opened or the server refuses
/// the credentials; the reason is logged rather than raised, and callers
/// must check for the absent connection.
pub fn connect(
    host: &str,
    port: u16,
    database: &str,
    user: &str,
    password: &str,
) -> Option<Database> {
    connect_with(
        ConnectOptions::default(),
        host,
        port,
        database,
        user,
        password,
    )
}

/// [`connect`] with explicit transport options.
pub fn connect_with(
    options: ConnectOptions,
    host: &str,
    port: u16,
    database: &str,
    user: &str,
    password: &str,
) -> Option<Database> {
    info!(host, port, "connecting to a docstore server");
    let start = Instant::now();
    let transport = match TcpLineTransport::connect(host, port, options.read_timeout) {
        Ok(transport) => transport,
        Err(err) => {
            warn!(%err, "failed to open a connection to the server");
            return None;
        }
    };
    let db = Database::over(Box::new(transport), database, options.max_failures);
    let response = db.execute(&Request::verify(db.next_id(), user, password, database));
    if !response.succeed() {
        warn!("could not verify with the docstore server");
        return None;
    }
    let verified = response
        .metadata()
        .get("succeed")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if !verified {
        let reason = response
            .metadata()
            .get("reason")
            .and_then(Value::as_str)
            .unwrap_or("");
        warn!(reason, "the server refused the credentials");
        db.close();
        return None;
    }
    info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "connected to the docstore server"
    );
    Some(db)
}

/// One verified connection, rooted at the store name it was opened for.
///
/// Cloning is cheap and shares the socket; handles returned by navigation
/// keep the connection alive through the same shared state.
#[derive(Clone)]
pub struct Database {
    inner: Arc<Inner>,
}

struct Inner {
    name: String,
    max_failures: u32,
    next_id: AtomicU64,
    transport: Mutex<Box<dyn LineTransport>>,
}

impl Database {
    /// Build a connection over an already-established transport.
    ///
    /// No handshake is performed here; [`connect`] issues the VERIFY round
    /// trip for TCP transports. Useful for custom transports and tests.
    pub fn over(
        transport: Box<dyn LineTransport>,
        name: impl Into<String>,
        max_failures: u32,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                max_failures,
                next_id: AtomicU64::new(0),
                transport: Mutex::new(transport),
            }),
        }
    }

    /// Root (store) name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Next correlation id; strictly increasing per connection, starting at 1.
    pub(crate) fn next_id(&self) -> u64 {
        self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn transport(&self) -> MutexGuard<'_, Box<dyn LineTransport>> {
        match self.inner.transport.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Execute one request and block for its response.
    ///
    /// A send/read error (read timeouts included), a malformed line, and a
    /// response with a foreign id each count as one failed attempt;
    /// mismatched responses are discarded, never surfaced. Once
    /// `max_failures` attempts are exhausted, a synthetic failed response
    /// carrying the request id is returned and no further I/O happens.
    pub fn execute(&self, request: &Request) -> Response {
        let mut transport = self.transport();
        let line = request.encode();
        for attempt in 1..=self.inner.max_failures {
            if attempt > 1 {
                warn!(
                    id = request.id(),
                    failures = attempt - 1,
                    "request failed to execute, retrying"
                );
            }
            if let Err(err) = transport.send_line(&line) {
                debug!(id = request.id(), %err, "failed to send request line");
                continue;
            }
            let received = match transport.read_line() {
                Ok(received) => received,
                Err(err) => {
                    debug!(id = request.id(), %err, "failed to read response line");
                    continue;
                }
            };
            match Response::parse(&received) {
                Ok(response) if response.id() == request.id() => return response,
                Ok(stray) => {
                    // Leftover from an earlier timed-out attempt.
                    debug!(
                        id = request.id(),
                        stray = stray.id(),
                        "discarding response with mismatched id"
                    );
                }
                Err(err) => {
                    debug!(id = request.id(), %err, "discarding malformed response line")
                }
            }
        }
        Response::failed(request.id())
    }

    /// Send a best-effort CLOSE and release the socket.
    ///
    /// Unlike [`execute`](Self::execute), CLOSE gets a single attempt: a
    /// server that is already gone should not cost the full retry budget on
    /// teardown. I/O errors are logged, not raised.
    pub fn close(&self) {
        let request = Request::close(self.next_id());
        let mut transport = self.transport();
        if let Err(err) = transport.send_line(&request.encode()) {
            debug!(id = request.id(), %err, "failed to send the close request");
        } else if let Err(err) = transport.read_line() {
            debug!(id = request.id(), %err, "no reply to the close request");
        }
        if let Err(err) = transport.shutdown() {
            warn!(%err, "error while closing the connection");
        }
    }

    /// Resolve a slash-delimited path from the root into a typed handle.
    ///
    /// An empty path resolves the root itself. The returned handle is a
    /// fresh snapshot: intermediate collections are materialized from the
    /// path segments and parent-linked up to the root.
    pub fn get(&self, path: &str) -> Result<File, OperationError> {
        let full = self.full_path(path);
        let response = self.execute(&Request::get(self.next_id(), &full));
        if !response.succeed() {
            return Err(OperationError::failed("GET", full, ""));
        }
        match response.metadata().as_str() {
            Some("none") => Ok(File::absent()),
            Some("document") => Ok(file::document_chain(self, path)),
            Some("collection") => Ok(file::collection_chain(self, path)),
            _ => Err(OperationError::invalid("GET", full, "")),
        }
    }

    /// Shortcut for `get("")`.
    pub fn root(&self) -> Result<File, OperationError> {
        self.get("")
    }

    /// Create a document or collection at a path from the root.
    ///
    /// An empty path creates the root itself. Without `force` the server
    /// refuses an existing name; with it, an existing entry of a different
    /// kind is replaced.
    pub fn create(&self, path: &str, kind: FileKind, force: bool) -> Result<(), OperationError> {
        file::create_at(self, self.full_path(path), kind, force)
    }

    /// Shortcut for `create("", kind, force)`.
    pub fn create_root(&self, kind: FileKind, force: bool) -> Result<(), OperationError> {
        self.create("", kind, force)
    }

    fn full_path(&self, path: &str) -> String {
        if path.is_empty() {
            self.inner.name.clone()
        } else {
            format!("{}/{}", self.inner.name, path)
        }
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("name", &self.inner.name)
            .field("max_failures", &self.inner.max_failures)
            .finish()
    }
}
