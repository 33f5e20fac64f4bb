// SPDX-License-Identifier: MIT
//
// Keyboard input — byte decoding and the background reader thread.
//
// Safety: the reader thread uses `unsafe` for poll(2) and read(2) on the
// stdin fd. Polling with a timeout is what lets the thread notice the stop
// flag; Rust's blocking `Stdin::read` would pin the thread until the user
// presses one more key.
#![allow(unsafe_code)]
//
// The terminal is in raw mode while the render loop runs, so keys arrive
// as bytes: printable characters as themselves, arrows as the 3-byte CSI
// sequences `ESC [ A..D`. The decoder is incremental — a sequence split
// across two reads is held until the tail arrives.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

/// Poll timeout. Bounds how long stopping the reader can take.
const POLL_INTERVAL_MS: i32 = 50;

/// A decoded key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyToken {
    Up,
    Down,
    Left,
    Right,
    /// Any other single character, control characters included
    /// (Ctrl-C arrives as `Char('\x03')` in raw mode).
    Char(char),
}

// ─── Decoder ─────────────────────────────────────────────────────────────────

/// Incremental raw-byte to [`KeyToken`] decoder.
#[derive(Debug, Default)]
pub struct KeyDecoder {
    pending: Vec<u8>,
}

impl KeyDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of raw bytes, appending decoded tokens to `out`.
    ///
    /// An incomplete escape sequence at the end of the chunk is retained
    /// for the next call.
    pub fn advance(&mut self, bytes: &[u8], out: &mut Vec<KeyToken>) {
        self.pending.extend_from_slice(bytes);

        let mut i = 0;
        while i < self.pending.len() {
            let b = self.pending[i];
            if b == 0x1b {
                let rest = &self.pending[i..];
                if rest.len() < 2 || (rest[1] == b'[' && rest.len() < 3) {
                    break; // possibly a split sequence, wait for more
                }
                if rest[1] == b'[' {
                    match rest[2] {
                        b'A' => out.push(KeyToken::Up),
                        b'B' => out.push(KeyToken::Down),
                        b'C' => out.push(KeyToken::Right),
                        b'D' => out.push(KeyToken::Left),
                        _ => {} // unrecognized CSI, swallow
                    }
                    i += 3;
                } else {
                    // ESC followed by a non-CSI byte: a bare escape press.
                    out.push(KeyToken::Char('\x1b'));
                    i += 1;
                }
            } else {
                if b < 0x80 {
                    out.push(KeyToken::Char(b as char));
                }
                // Non-ASCII bytes are dropped; no viewer binds them.
                i += 1;
            }
        }
        self.pending.drain(..i);
    }

    /// Resolve a held escape after a read timeout: a lone `ESC` with no
    /// tail is a real escape key press, not a sequence prefix.
    pub fn flush(&mut self, out: &mut Vec<KeyToken>) {
        if self.pending.as_slice() == [0x1b] {
            out.push(KeyToken::Char('\x1b'));
        }
        self.pending.clear();
    }
}

// ─── Reader Thread ───────────────────────────────────────────────────────────

/// Background thread that reads stdin and delivers [`KeyToken`]s over a
/// channel. Stops on drop.
pub struct KeyReader {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl KeyReader {
    /// Spawn the reader and return it with the receiving end of the
    /// token channel.
    #[must_use]
    pub fn spawn() -> (Self, Receiver<KeyToken>) {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("key-reader".into())
            .spawn(move || read_loop(&thread_stop, &tx))
            .expect("failed to spawn key-reader thread");

        (
            Self {
                stop,
                handle: Some(handle),
            },
            rx,
        )
    }

    /// Signal the thread to stop and wait for it to exit.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for KeyReader {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(unix)]
fn read_loop(stop: &AtomicBool, tx: &Sender<KeyToken>) {
    let mut decoder = KeyDecoder::new();
    let mut tokens = Vec::new();
    let mut buf = [0u8; 64];

    while !stop.load(Ordering::SeqCst) {
        let mut pfd = libc::pollfd {
            fd: libc::STDIN_FILENO,
            events: libc::POLLIN,
            revents: 0,
        };
        let ready = unsafe { libc::poll(&raw mut pfd, 1, POLL_INTERVAL_MS) };

        if ready < 0 {
            let err = std::io::Error::last_os_error();
            if err.kind() == std::io::ErrorKind::Interrupted {
                continue;
            }
            log::warn!("key-reader poll failed: {err}");
            return;
        }
        if ready == 0 {
            // Timeout: resolve any held lone escape.
            decoder.flush(&mut tokens);
            if drain(&mut tokens, tx).is_err() {
                return;
            }
            continue;
        }

        let n = unsafe {
            libc::read(
                libc::STDIN_FILENO,
                buf.as_mut_ptr().cast::<libc::c_void>(),
                buf.len(),
            )
        };
        if n <= 0 {
            return; // EOF or read error, nothing more will arrive
        }
        decoder.advance(&buf[..n as usize], &mut tokens);
        if drain(&mut tokens, tx).is_err() {
            return;
        }
    }
}

#[cfg(not(unix))]
fn read_loop(_stop: &AtomicBool, _tx: &Sender<KeyToken>) {}

/// Forward decoded tokens; an error means the receiver is gone.
#[cfg(unix)]
fn drain(tokens: &mut Vec<KeyToken>, tx: &Sender<KeyToken>) -> Result<(), ()> {
    for token in tokens.drain(..) {
        tx.send(token).map_err(|_| ())?;
    }
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
