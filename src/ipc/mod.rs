//! IPC listener that accepts intents over a Unix socket.
//!
//! External tools (a browser extension bridge, scripts, key-bind helpers)
//! can connect to the socket, send newline-delimited JSON intents and read
//! back one status line per intent.

pub mod listener;
