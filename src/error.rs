use std::io;

use nix::errno::Errno;

use crate::tracer::Pid;


pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Could not launch target process")]
    Launch {
        source: nix::Error,
    },

    #[error("Tracee = {pid} died mid-request")]
    TraceeDied {
        pid: Pid,
        source: nix::Error,
    },

    #[error("Input/output error")]
    IO(#[from] io::Error),

    #[error("OS error")]
    OS(#[from] nix::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True iff the error was caused by the tracee dying mid-request, e.g. via an
    /// externally-delivered `SIGKILL`.
    pub fn tracee_died(&self) -> bool {
        matches!(self, Error::TraceeDied { .. })
    }
}

// Lift `ESRCH` from a ptrace request into `TraceeDied`, which callers may tolerate. The
// tracee can be killed at any time, even while stopped.
pub(crate) trait ResultExt<T> {
    fn died_if_esrch(self, pid: Pid) -> Result<T>;
}

impl<T> ResultExt<T> for std::result::Result<T, nix::Error> {
    fn died_if_esrch(self, pid: Pid) -> Result<T> {
        self.map_err(|source| {
            if source == Errno::ESRCH {
                Error::TraceeDied { pid, source }
            } else {
                Error::OS(source)
            }
        })
    }
}

macro_rules! internal_error {
    ($msg:expr) => {
        return Err($crate::error::Error::Internal($msg.into()))
    };
}
