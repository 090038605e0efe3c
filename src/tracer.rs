//! Types for launching the traced process and driving it, stop by stop, to exit.

use std::fmt;
use std::io::Write;

use nix::sys::{
    ptrace,
    wait::{self, WaitStatus},
};
use tracing::{debug, trace};

use crate::cmd::Command;
use crate::error::{Result, ResultExt};
use crate::report::Reporter;
use crate::syscalls;

pub use nix::unistd::Pid;
pub use nix::sys::ptrace::Options;

/// POSIX signal.
pub use nix::sys::signal::Signal;

/// Register state of a tracee, as captured by `PTRACE_GETREGS`.
pub type Registers = libc::user_regs_struct;

/// Point-in-time copy of the tracee's registers at one trace stop.
///
/// A snapshot carries both halves of the syscall ABI: the syscall-number register is
/// meaningful at an entry stop, the return-value register at an exit stop. Which half is
/// valid is decided by the loop state, not by the snapshot itself.
#[derive(Clone, Copy)]
pub struct RegisterSnapshot {
    regs: Registers,
}

impl RegisterSnapshot {
    pub fn new(regs: Registers) -> Self {
        Self { regs }
    }

    /// Syscall number, from `orig_rax`.
    ///
    /// `rax` proper is clobbered with `-ENOSYS` on syscall entry, so the kernel preserves
    /// the number out-of-band for tracers.
    pub fn syscall_number(&self) -> u64 {
        self.regs.orig_rax
    }

    /// Signed return value, from `rax`. Errors appear as `-errno`.
    pub fn return_value(&self) -> i64 {
        self.regs.rax as i64
    }
}

impl fmt::Debug for RegisterSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterSnapshot")
            .field("syscall_number", &self.syscall_number())
            .field("return_value", &self.return_value())
            .finish_non_exhaustive()
    }
}

/// One syscall as observed at its boundary stops.
///
/// A record opens at the entry stop, carrying the number and its resolved name, and
/// closes at the matching exit stop with the return value. A record that is still open
/// when the tracee terminates never receives a value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SyscallRecord {
    no: u64,
    name: &'static str,
    retval: Option<i64>,
}

impl SyscallRecord {
    /// Open a record for the call entered with syscall number `no`.
    pub fn open(no: u64) -> Self {
        let name = syscalls::name(no);

        Self { no, name, retval: None }
    }

    /// Close the record with the value observed at the exit stop.
    pub fn close(mut self, retval: i64) -> Self {
        self.retval = Some(retval);
        self
    }

    pub fn number(&self) -> u64 {
        self.no
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// `None` iff the record is still open.
    pub fn return_value(&self) -> Option<i64> {
        self.retval
    }
}

/// How the traced process terminated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExitKind {
    /// Normal termination, with an exit code.
    Exited { code: i32 },

    /// Killed by an unhandled signal.
    Signaled { signal: Signal, core_dumped: bool },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    // Spawned with a pre-exec `TRACEME` request, not yet observed to stop.
    Launching,

    // Resumed into syscall tracing, but still running launcher code: every boundary
    // until the exec event belongs to `execvp()` machinery, not to the target program.
    ImageLoad,

    // Saw the exec event. The next syscall-stop is the exit of the call that loaded the
    // image.
    ExecReturn,

    // Next syscall-stop is an entry.
    AwaitingEntry,

    // Next syscall-stop is the exit matching `open`.
    AwaitingExit { open: SyscallRecord },

    // Terminal wait status consumed.
    Exited,
}

/// The single child process under trace.
///
/// **Warning:** the underlying process is not guaranteed to exist between stops, and
/// requests against it may fail with [`Error::TraceeDied`](crate::error::Error::TraceeDied).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TracedProcess {
    pid: Pid,
    state: State,
}

impl TracedProcess {
    fn new(pid: Pid) -> Self {
        Self { pid, state: State::Launching }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    // Capture the register state at the current stop.
    fn snapshot(&self) -> Result<RegisterSnapshot> {
        let regs = ptrace::getregs(self.pid).died_if_esrch(self.pid)?;

        Ok(RegisterSnapshot::new(regs))
    }
}

/// Ptrace options armed on the tracee before its first resume.
/// These are:
/// - [`PTRACE_O_TRACESYSGOOD`](Options::PTRACE_O_TRACESYSGOOD), to tell syscall-stops
///   apart from ordinary `SIGTRAP` deliveries
/// - [`PTRACE_O_TRACEEXEC`](Options::PTRACE_O_TRACEEXEC), to observe the image load as a
///   dedicated event rather than a legacy post-exec `SIGTRAP`
/// - [`PTRACE_O_EXITKILL`](Options::PTRACE_O_EXITKILL), so the tracee cannot outlive a
///   dying tracer
pub const TRACE_OPTIONS: Options = Options::empty()
    .union(Options::PTRACE_O_TRACESYSGOOD)
    .union(Options::PTRACE_O_TRACEEXEC)
    .union(Options::PTRACE_O_EXITKILL);

// One observed wait status, classified for the trace loop.
#[derive(Clone, Copy, Debug)]
enum TraceStop {
    // Syscall-stop. Whether it is an entry or an exit is decided by alternation.
    Boundary { regs: RegisterSnapshot },

    // `PTRACE_EVENT_EXEC`: the target image replaced the launcher.
    ImageLoaded,

    // Signal-delivery-stop, to be forwarded on resume.
    SignalDelivery { signal: Signal },

    // Terminal status; the process is gone.
    Exited(ExitKind),
}

/// Tracer for a single Linux process, reporting every syscall boundary.
///
/// [Spawning](Tracer::spawn) leaves the tracee stopped with [`TRACE_OPTIONS`] armed and
/// the first resume issued; [`run()`](Tracer::run) then alternates waiting and resuming
/// until the tracee terminates, pushing each syscall into a [`Reporter`].
#[derive(Debug)]
pub struct Tracer {
    tracee: TracedProcess,
}

impl Tracer {
    /// Spawn `cmd` as a tracee and resume it toward its first program image.
    pub fn spawn(cmd: Command) -> Result<Self> {
        let pid = cmd.fork_exec()?;
        let mut tracee = TracedProcess::new(pid);

        // The child raises `SIGSTOP` right after its `TRACEME` request. Once that stop
        // is observed, the tracee is frozen and options can be armed race-free.
        match wait::waitpid(pid, None)? {
            WaitStatus::Stopped(_, Signal::SIGSTOP) => {},
            status => internal_error!(format!("unexpected initial wait status: {:?}", status)),
        }

        ptrace::setoptions(pid, TRACE_OPTIONS).died_if_esrch(pid)?;
        tracee.state = State::ImageLoad;

        debug!(pid = pid.as_raw(), "tracee attached, resuming into image load");

        let tracer = Self { tracee };
        tracer.resume(None)?;

        Ok(tracer)
    }

    /// The process under trace.
    pub fn tracee(&self) -> TracedProcess {
        self.tracee
    }

    /// Drive the tracee to termination, reporting each syscall boundary to `report`.
    ///
    /// Each iteration performs one blocking wait and at most one resume. Resuming twice
    /// without an intervening wait would desynchronize the entry/exit alternation, so no
    /// path here does.
    pub fn run<W: Write>(&mut self, report: &mut Reporter<W>) -> Result<ExitKind> {
        loop {
            let stop = match self.wait() {
                Ok(stop) => stop,
                Err(err) if err.tracee_died() => {
                    // Killed while stopped. The terminal wait status is still queued for
                    // us; the next wait consumes it.
                    trace!("tracee died under inspection");
                    continue;
                },
                Err(err) => return Err(err),
            };

            let signal = match stop {
                TraceStop::Boundary { regs } => {
                    self.advance(&regs, report)?;
                    None
                },
                TraceStop::ImageLoaded => {
                    self.image_loaded()?;
                    None
                },
                TraceStop::SignalDelivery { signal } => {
                    trace!(?signal, "forwarding signal");
                    Some(signal)
                },
                TraceStop::Exited(exit) => {
                    self.finish(report)?;
                    debug!(?exit, "tracee terminated");

                    return Ok(exit);
                },
            };

            match self.resume(signal) {
                Ok(()) => {},
                Err(err) if err.tracee_died() => {
                    trace!("tracee died at resume");
                },
                Err(err) => return Err(err),
            }
        }
    }

    // Block until the tracee's next stop, and classify it.
    fn wait(&self) -> Result<TraceStop> {
        let pid = self.tracee.pid;

        let status = wait::waitpid(pid, None)?;
        trace!(?status, "wait status");

        let stop = match status {
            WaitStatus::Exited(_, code) => {
                TraceStop::Exited(ExitKind::Exited { code })
            },
            WaitStatus::Signaled(_, signal, core_dumped) => {
                TraceStop::Exited(ExitKind::Signaled { signal, core_dumped })
            },
            WaitStatus::Stopped(_, signal) => {
                TraceStop::SignalDelivery { signal }
            },
            WaitStatus::PtraceEvent(_, _, libc::PTRACE_EVENT_EXEC) => {
                TraceStop::ImageLoaded
            },
            WaitStatus::PtraceEvent(_, _, event) => {
                // Only exec events are armed in `TRACE_OPTIONS`.
                internal_error!(format!("unexpected ptrace-event-stop: {}", event))
            },
            WaitStatus::PtraceSyscall(_) => {
                let regs = self.tracee.snapshot()?;
                TraceStop::Boundary { regs }
            },
            // Assume `!WNOHANG`, `!WCONTINUED`.
            WaitStatus::Continued(_) |
            WaitStatus::StillAlive =>
                internal_error!("unreachable `wait()` status"),
        };

        Ok(stop)
    }

    // Apply a syscall-stop to the alternation, emitting trace decorations as records
    // open and close.
    //
    // From the ptrace(2) manual:
    //
    //     Syscall-enter-stop and syscall-exit-stop are indistinguishable from
    //     each other by the tracer.  The tracer needs to keep track of the
    //     sequence of ptrace-stops in order to not misinterpret syscall-enter-
    //     stop as syscall-exit-stop or vice versa.
    //
    // The sequence here is anchored by the exec event: boundaries before it belong to
    // the launcher and are discarded, the first one after it is the exit of the call
    // that loaded the image, and strict alternation labels everything else.
    fn advance<W: Write>(
        &mut self,
        regs: &RegisterSnapshot,
        report: &mut Reporter<W>,
    ) -> Result<()> {
        let state = self.tracee.state;

        match state {
            State::ImageLoad => {
                // Pre-exec boundary, e.g. a failed `execve()` attempt during the PATH
                // walk. Not part of the target's trace.
                trace!(no = regs.syscall_number(), "discarding pre-exec boundary");
            },
            State::ExecReturn => {
                // Exit stop of the call that loaded the image. Its entry stop was
                // discarded above, so emit both halves of the line here: the number
                // register still names the exec call, and the value register already
                // carries its return.
                let record = SyscallRecord::open(regs.syscall_number())
                    .close(regs.return_value());
                report.enter(&record)?;
                report.exit(&record)?;

                self.set_state(State::AwaitingEntry);
            },
            State::AwaitingEntry => {
                let record = SyscallRecord::open(regs.syscall_number());
                report.enter(&record)?;

                self.set_state(State::AwaitingExit { open: record });
            },
            State::AwaitingExit { open } => {
                let record = open.close(regs.return_value());
                report.exit(&record)?;

                self.set_state(State::AwaitingEntry);
            },
            State::Launching | State::Exited => {
                internal_error!("syscall-stop outside the trace loop");
            },
        }

        Ok(())
    }

    // The exec event: launcher code is gone, the target image is live.
    fn image_loaded(&mut self) -> Result<()> {
        match self.tracee.state {
            State::ImageLoad => {
                // Mid-exec. The next syscall-stop is this call's exit.
                self.set_state(State::ExecReturn);
            },
            State::AwaitingExit { .. } => {
                // The target exec'd again mid-run. The event lands between the exec
                // call's entry and exit stops, so the open record already brackets it
                // and the anchor stands.
            },
            State::Launching | State::ExecReturn | State::AwaitingEntry | State::Exited => {
                internal_error!("unexpected exec event");
            },
        }

        Ok(())
    }

    // Consume the terminal status: a call still open at termination has no observable
    // return value, and its line is closed with the `?` marker.
    fn finish<W: Write>(&mut self, report: &mut Reporter<W>) -> Result<()> {
        if let State::AwaitingExit { open } = self.tracee.state {
            report.exit(&open)?;
        }

        self.set_state(State::Exited);

        Ok(())
    }

    // Re-arm "stop at the next syscall boundary" and let the tracee run, delivering
    // `signal` if present.
    fn resume(&self, signal: Option<Signal>) -> Result<()> {
        let pid = self.tracee.pid;

        Ok(ptrace::syscall(pid, signal).died_if_esrch(pid)?)
    }

    fn set_state(&mut self, state: State) {
        debug!(pid = self.tracee.pid.as_raw(), ?state, "setting tracee state");

        self.tracee.state = state;
    }
}
