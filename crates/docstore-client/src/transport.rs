// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Line-oriented transport abstraction
//!
//! The connection executor speaks through this trait so it works both over a
//! real TCP socket and against test doubles. One UTF-8 line per message; the
//! framing delimiter is the transport's concern.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

/// Byte-stream access under one connection.
pub trait LineTransport: Send {
    /// Write one message line (delimiter excluded).
    fn send_line(&mut self, line: &str) -> io::Result<()>;

    /// Block for one response line, bounded by the read timeout configured
    /// at transport setup. Timeouts surface as an `io::Error`.
    fn read_line(&mut self) -> io::Result<String>;

    /// Release the underlying streams.
    fn shutdown(&mut self) -> io::Result<()>;
}

/// TCP transport with newline framing.
pub struct TcpLineTransport {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl TcpLineTransport {
    /// Connect and apply the read timeout once at setup.
    pub fn connect(host: &str, port: u16, read_timeout: Duration) -> io::Result<Self> {
        let stream = TcpStream::connect((host, port))?;
        stream.set_read_timeout(Some(read_timeout))?;
        let reader = BufReader::new(stream.try_clone()?);
        Ok(Self {
            reader,
            writer: stream,
        })
    }
}

impl LineTransport for TcpLineTransport {
    fn send_line(&mut self, line: &str) -> io::Result<()> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }

    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        let read = self.reader.read_line(&mut line)?;
        if read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed by the server",
            ));
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(line)
    }

    fn shutdown(&mut self) -> io::Result<()> {
        self.writer.shutdown(Shutdown::Both)
    }
}
