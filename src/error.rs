use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("terminal too small: need at least {need_w}x{need_h} (cols x rows), have {have_w}x{have_h}")]
    TerminalTooSmall {
        need_w: u16,
        need_h: u16,
        have_w: u16,
        have_h: u16,
    },

    #[error("failed to set up logging: {0}")]
    Logging(String),

    #[error("maze supervisor thread panicked")]
    SupervisorPanicked,
}

pub type Result<T> = std::result::Result<T, Error>;
