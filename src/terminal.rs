//! Terminal geometry via `TIOCGWINSZ`.

use std::io;
use tracing::debug;

/// Size of the controlling terminal in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub rows: u16,
    pub cols: u16,
}

fn window_size_of(fd: libc::c_int) -> io::Result<WindowSize> {
    let mut ws = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };

    // SAFETY: TIOCGWINSZ writes a `struct winsize` through the pointer, which
    // points at a live, properly sized value.
    let ret = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut ws as *mut libc::winsize) };
    if ret != 0 {
        return Err(io::Error::last_os_error());
    }
    if ws.ws_col == 0 {
        return Err(io::Error::other("terminal reported zero columns"));
    }

    Ok(WindowSize {
        rows: ws.ws_row,
        cols: ws.ws_col,
    })
}

/// Queries the terminal size from stdout, then stdin, then stderr.
///
/// Returns the error of the last attempt when none of them is a terminal.
pub fn window_size() -> io::Result<WindowSize> {
    let mut last_err = io::Error::other("no terminal attached");
    for fd in [libc::STDOUT_FILENO, libc::STDIN_FILENO, libc::STDERR_FILENO] {
        match window_size_of(fd) {
            Ok(ws) => {
                debug!("terminal size {}x{} (fd {})", ws.cols, ws.rows, fd);
                return Ok(ws);
            }
            Err(e) => last_err = e,
        }
    }
    Err(last_err)
}
