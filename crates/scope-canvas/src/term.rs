// SPDX-License-Identifier: MIT
//
// Terminal control — shape queries, raw mode, and RAII cleanup.
//
// Safety: this module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), isatty, and raw fd writes. These are the
// standard POSIX interfaces for terminal control — there is no safe
// alternative. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// The Terminal guard owns the terminal's raw state for the lifetime of the
// render loop: it enters raw mode (so the key reader sees bytes, not
// lines), hides the cursor, and guarantees restore on drop — including the
// panic path, where a pre-built restore sequence is written directly to
// fd 1 so the panic message lands on a working terminal even if the panic
// happened while the stdout lock was held mid-frame.

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use crate::ansi;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Character-cell shape of the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    /// Cell count, `cols × rows`.
    #[inline]
    #[must_use]
    pub const fn area(self) -> u32 {
        self.cols as u32 * self.rows as u32
    }

    /// The derived sub-cell pixel shape: `(cols × 2, rows × 4)`.
    ///
    /// Always computed from the character shape, never stored — the two
    /// can't drift apart.
    #[inline]
    #[must_use]
    pub const fn pixels(self) -> (u32, u32) {
        (self.cols as u32 * 2, self.rows as u32 * 4)
    }
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// The terminal's current cell shape, from `ioctl(TIOCGWINSZ)` on stdout.
/// `None` when stdout is not a terminal or the kernel reports a zero axis.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Whether stdin is a TTY.
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Termios state as it was before raw mode, stashed for the panic hook.
///
/// The hook runs with no access to the [`Terminal`] value that entered raw
/// mode, so the saved state also lives here, in a process-wide `Mutex`.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Put the stashed termios back. Ignores every failure: there is nothing
/// useful to do with an error while the process is already panicking.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original);
            }
        }
    }
}

/// Restore sequence for emergency use: reset color, show cursor.
const EMERGENCY_RESTORE: &[u8] = b"\x1b[0m\x1b[?25h\n";

/// One hook per process, no matter how many canvases come and go.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Chain a terminal-restoring step in front of the existing panic handler.
///
/// A panic mid-frame would otherwise dump its message into a raw-mode
/// terminal with a hidden cursor and no echo. The hook pushes
/// [`EMERGENCY_RESTORE`] straight to fd 1 rather than through `io::stdout`,
/// since the panicking thread may already hold the stdout lock, puts
/// termios back, and only then hands off to the previous handler.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

/// Push the restore bytes to the stdout fd, skipping the Rust-side lock.
fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Owner of the terminal's raw state for the life of the render loop.
///
/// [`enter`](Self::enter) switches to raw mode, hides the cursor, and
/// clears the screen; dropping the handle (or panicking while it lives)
/// puts everything back.
pub struct Terminal {
    /// Termios as it was before [`enter`](Self::enter).
    #[cfg(unix)]
    original_termios: Option<libc::termios>,

    /// Current terminal size (cached; refresh with [`refresh_size`](Self::refresh_size)).
    size: Size,

    /// Whether raw mode and canvas output are active.
    active: bool,
}

impl Terminal {
    /// Build a handle and take an initial size reading. The terminal is
    /// left untouched until [`enter`](Self::enter).
    ///
    /// # Errors
    ///
    /// Fails with [`io::ErrorKind::Unsupported`] when no size can be
    /// determined, which means there is no terminal to draw on.
    pub fn new() -> io::Result<Self> {
        let size = get_size().ok_or_else(|| {
            io::Error::new(io::ErrorKind::Unsupported, "no controlling terminal")
        })?;

        Ok(Self {
            #[cfg(unix)]
            original_termios: None,
            size,
            active: false,
        })
    }

    /// The cached size from the last query.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Re-query the terminal size from the OS and cache it.
    pub fn refresh_size(&mut self) -> Size {
        if let Some(s) = get_size() {
            self.size = s;
        }
        self.size
    }

    /// Whether raw mode is currently active.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Enter canvas mode: raw termios, hidden cursor, cleared screen.
    /// A second call while already active does nothing.
    ///
    /// # Errors
    ///
    /// Propagates termios and terminal write failures.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }

        install_panic_hook();
        self.enable_raw_mode()?;

        let stdout = io::stdout();
        let mut lock = stdout.lock();
        ansi::cursor_hide(&mut lock)?;
        ansi::clear_screen(&mut lock)?;
        ansi::cursor_home(&mut lock)?;
        lock.flush()?;

        self.active = true;
        Ok(())
    }

    /// Leave canvas mode: reset color, park the cursor on the bottom row
    /// and show it again, restore termios. Safe to call twice.
    ///
    /// # Errors
    ///
    /// Propagates termios and terminal write failures.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }

        let stdout = io::stdout();
        let mut lock = stdout.lock();
        ansi::reset(&mut lock)?;
        ansi::cursor_to(&mut lock, 0, self.size.rows.saturating_sub(1))?;
        ansi::cursor_show(&mut lock)?;
        lock.write_all(b"\n")?;
        lock.flush()?;
        drop(lock);

        self.disable_raw_mode()?;
        self.active = false;
        Ok(())
    }

    // ── Raw Mode (termios) ──────────────────────────────────────────

    #[cfg(unix)]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        use std::os::unix::io::AsRawFd;

        if !is_tty() {
            return Ok(());
        }

        let fd = io::stdin().as_raw_fd();

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }

            // Stash the pre-raw state twice: here for leave(), and in the
            // global slot the panic hook reads from.
            self.original_termios = Some(termios);
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = Some(termios);
            }

            // The cfmakeraw flag set: no line discipline at all.
            termios.c_iflag &= !(libc::IGNBRK
                | libc::BRKINT
                | libc::PARMRK
                | libc::ISTRIP
                | libc::INLCR
                | libc::IGNCR
                | libc::ICRNL
                | libc::IXON);
            termios.c_oflag &= !libc::OPOST;
            termios.c_lflag &=
                !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
            termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
            termios.c_cflag |= libc::CS8;

            // Block each read() until one byte arrives; the key reader
            // does its own timeouts with poll(2).
            termios.c_cc[libc::VMIN] = 1;
            termios.c_cc[libc::VTIME] = 0;

            if libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const termios) != 0 {
                return Err(io::Error::last_os_error());
            }
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(unix)]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        if let Some(ref original) = self.original_termios {
            use std::os::unix::io::AsRawFd;
            let fd = io::stdin().as_raw_fd();

            unsafe {
                if libc::tcsetattr(fd, libc::TCSAFLUSH, original) != 0 {
                    return Err(io::Error::last_os_error());
                }
            }

            // The hook has nothing left to restore.
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = None;
            }

            self.original_termios = None;
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.active {
            let _ = self.leave();
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Size ──────────────────────────────────────────────────────────

    #[test]
    fn size_area() {
        assert_eq!(Size { cols: 80, rows: 24 }.area(), 1920);
    }

    #[test]
    fn size_area_zero() {
        assert_eq!(Size { cols: 0, rows: 24 }.area(), 0);
        assert_eq!(Size { cols: 80, rows: 0 }.area(), 0);
    }

    #[test]
    fn pixel_shape_is_derived() {
        let s = Size { cols: 80, rows: 24 };
        assert_eq!(s.pixels(), (160, 96));
    }

    #[test]
    fn pixel_shape_tracks_character_shape() {
        for (cols, rows) in [(1u16, 1u16), (120, 40), (500, 200)] {
            let s = Size { cols, rows };
            assert_eq!(s.pixels(), (u32::from(cols) * 2, u32::from(rows) * 4));
        }
    }

    #[test]
    fn size_is_copy_and_eq() {
        let a = Size { cols: 80, rows: 24 };
        let b = a;
        assert_eq!(a, b);
        assert_ne!(a, Size { cols: 81, rows: 24 });
    }

    // ── Terminal queries ─────────────────────────────────────────────

    #[test]
    fn get_size_does_not_panic() {
        let _ = get_size();
    }

    #[test]
    fn is_tty_does_not_panic() {
        let _ = is_tty();
    }

    // ── Emergency restore sequence ──────────────────────────────────

    #[test]
    fn emergency_restore_resets_and_shows_cursor() {
        let s = std::str::from_utf8(EMERGENCY_RESTORE).unwrap();
        assert!(s.contains("\x1b[0m"), "must reset SGR attributes");
        assert!(s.contains("\x1b[?25h"), "must show cursor");
    }
}
