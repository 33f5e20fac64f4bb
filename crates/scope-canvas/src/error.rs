// SPDX-License-Identifier: MIT
//
// Error types for canvas construction and output.
//
// Geometry is never an error anywhere in this crate (out-of-range draw
// calls clip silently, by policy). What can fail is the environment: a
// missing controlling terminal at startup, or stdout I/O when flushing a
// frame.

use std::io;

use thiserror::Error;

/// Errors from canvas construction and frame output.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Stdout has no controlling terminal, so the shape cannot be
    /// determined. Fatal at startup — the renderer cannot run headless.
    #[error(
        "stdout is not attached to a terminal (cannot determine shape); \
         run inside an interactive terminal"
    )]
    NotATty,

    /// An I/O failure while writing a frame to the terminal.
    #[error("terminal output failed: {0}")]
    Io(#[from] io::Error),
}
