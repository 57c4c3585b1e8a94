//! Unix-socket [`IntentSource`] implementation.
//!
//! A front end (a browser bridge, a key-bind script) connects to the socket
//! and writes one JSON [`Intent`] per line.  Every non-blank line gets a
//! one-line JSON reply so the client knows whether its intent was queued:
//!
//! ```text
//! > {"Assign":{"stream":"shroud","position":0}}
//! < {"status":"queued"}
//! > {"Resize":"7x7"}
//! < {"status":"rejected","error":"bad intent: invalid layout: \"7x7\" at line 1 column 15"}
//! ```
//!
//! "Queued" means the intent reached the session's channel.  Whether the
//! grid accepts it is reported by the session itself, through its log and
//! its observers.

use crate::intent::Intent;
use crate::traits::IntentSource;
use log::{debug, info, warn};
use serde::Serialize;
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// Listens on a Unix stream socket and queues the intents it receives.
///
/// Clients are served one at a time, in the order they connect.
pub struct UnixSocketListener {
    path: PathBuf,
}

/// Errors produced by the Unix socket listener.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("bad intent: {0}")]
    Json(#[from] serde_json::Error),
}

/// Answer written back for every intent line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum Reply {
    Queued,
    Rejected { error: String },
}

/// Whether the session is still draining the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sink {
    Open,
    Closed,
}

/// Parse one line of the wire format.  Blank lines carry no intent.
fn parse_line(line: &str) -> Result<Option<Intent>, ListenerError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(line)?))
}

fn write_reply(out: &mut impl Write, reply: &Reply) -> Result<(), ListenerError> {
    serde_json::to_writer(&mut *out, reply)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

/// Forward every intent from one client into `sink`, replying per line.
fn serve(stream: UnixStream, sink: &mpsc::Sender<Intent>) -> Result<Sink, ListenerError> {
    let mut out = stream.try_clone()?;
    for line in BufReader::new(stream).lines() {
        let reply = match parse_line(&line?) {
            Ok(None) => continue,
            Ok(Some(intent)) => {
                debug!("queued {:?}", intent);
                if sink.send(intent).is_err() {
                    return Ok(Sink::Closed);
                }
                Reply::Queued
            }
            Err(e) => {
                warn!("{}", e);
                Reply::Rejected {
                    error: e.to_string(),
                }
            }
        };
        // A client that hung up without reading replies is not an error.
        if let Err(e) = write_reply(&mut out, &reply) {
            debug!("reply not delivered: {}", e);
        }
    }
    Ok(Sink::Open)
}

impl UnixSocketListener {
    /// Create a listener for the socket at `path`.  Nothing is bound until
    /// [`run`](IntentSource::run).
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IntentSource for UnixSocketListener {
    type Error = ListenerError;

    /// Bind the socket and serve clients until the session drops its
    /// receiver.  Blocks; run it on its own thread.
    fn run(&mut self, sink: mpsc::Sender<Intent>) -> Result<(), Self::Error> {
        // A socket file left by a previous run would make bind fail.
        let _ = std::fs::remove_file(&self.path);
        let listener = UnixListener::bind(&self.path)?;
        info!("listening for intents on {}", self.path.display());

        for client in listener.incoming() {
            let client = match client {
                Ok(c) => c,
                Err(e) => {
                    warn!("accept failed: {}", e);
                    continue;
                }
            };
            debug!("client connected");
            match serve(client, &sink) {
                Ok(Sink::Open) => debug!("client disconnected"),
                Ok(Sink::Closed) => {
                    info!("session stopped, closing {}", self.path.display());
                    let _ = std::fs::remove_file(&self.path);
                    return Ok(());
                }
                Err(e) => warn!("client dropped: {}", e),
            }
        }
        Ok(())
    }
}

//  Tests
