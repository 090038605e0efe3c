#[macro_use]
pub mod error;

pub mod cmd;
pub mod report;
pub mod syscalls;
pub mod tracer;

pub use cmd::Command;
pub use error::Error;
pub use report::Reporter;
pub use tracer::{ExitKind, Pid, RegisterSnapshot, Registers, Signal, SyscallRecord, TracedProcess, Tracer};

#[cfg(not(all(target_os = "linux", target_arch = "x86_64")))]
compile_error!("this crate reads the x86_64 Linux syscall ABI and supports no other target");
