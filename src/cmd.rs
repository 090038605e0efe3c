use std::ffi::{CString, NulError};

use nix::{
    sys::{signal::{raise, Signal}, ptrace},
    unistd::{fork, ForkResult, Pid},
};

use crate::error::Error;


// Conventional shell exit status for a command that could not be exec'd. The parent
// observes it as an ordinary tracee exit.
const EXEC_FAILED: i32 = 127;

/// Target program to spawn as the traced child process.
#[derive(Clone, Debug)]
pub struct Command {
    /// Argument vector to pass to `execvp()`. The first element names the program, and
    /// is resolved against `PATH` like a shell would.
    argv: Vec<CString>,
}

impl Command {
    pub fn new(argv: Vec<impl Into<Vec<u8>>>) -> Result<Self, NulError> {
        if argv.is_empty() {
            panic!("Command exe required");
        }

        // Ensure we own NUL-terminated strings for the foreign exec call.
        //
        // We're heap-allocating, so always do this before forking.
        let argv: Result<Vec<_>, _> = argv
            .into_iter()
            .map(CString::new)
            .collect();
        let argv = argv?;

        Ok(Self { argv })
    }

    /// Fork and exec a child process determined by `self.argv`.
    ///
    /// The child sets itself as a tracee of the parent, then raises `SIGSTOP` so the
    /// parent can observe it stopped, arm trace options, and resume it without a race.
    /// All of that happens before `exec()`, so a target that cannot be exec'd is already
    /// a tracee when it fails.
    pub fn fork_exec(self) -> Result<Pid, Error> {
        // Heap-allocates, must occur pre-fork.
        let argv = self.argv();

        match unsafe { fork() }.map_err(|source| Error::Launch { source })? {
            ForkResult::Child => {
                // Past the fork, failures cannot be reported in-band: returning an error
                // would unwind a copied stack, and heap allocation is off-limits. Exit
                // with the shell's command-not-found status instead.

                if ptrace::traceme().is_err() {
                    unsafe { libc::_exit(EXEC_FAILED) };
                }

                if raise(Signal::SIGSTOP).is_err() {
                    unsafe { libc::_exit(EXEC_FAILED) };
                }

                // Use unsafe `libc::execvp`, because the `nix` wrapper heap-allocates a
                // `Vec` internally, which is not async-signal-safe.
                unsafe {
                    libc::execvp(argv[0], argv.as_ptr());

                    // Only reached when the exec itself failed.
                    libc::_exit(EXEC_FAILED)
                }
            },
            ForkResult::Parent { child } => {
                Ok(child)
            },
        }
    }

    // Construct NUL-terminated arguments for `execvp`. We heap-allocate to return a
    // `Vec`, and so must do this before calling `fork()`.
    fn argv(&self) -> Vec<*const libc::c_char> {
        let mut argv: Vec<_> = self.argv
            .iter()
            .map(|s| s.as_ptr())
            .collect();
        argv.push(std::ptr::null());
        argv
    }
}
