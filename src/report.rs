//! Renders syscall boundary events as single-line trace records.

use std::fmt;
use std::io::{self, Write};

use crate::tracer::SyscallRecord;


/// Writes the textual trace, one completed syscall per line.
///
/// The entry half of a record renders as `name(...)`; the exit half completes the line
/// with ` = <value>`. Every emission is flushed immediately, so trace lines interleave
/// with the tracee's own writes when both share a stream.
pub struct Reporter<W> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Emit the entry decoration for `record`.
    pub fn enter(&mut self, record: &SyscallRecord) -> io::Result<()> {
        write!(self.out, "{}(...)", record.name())?;
        self.out.flush()
    }

    /// Emit the exit decoration for `record`, completing its line.
    ///
    /// A record without a return value renders as ` = ?`: the tracee terminated inside
    /// the call, so no value was ever observable.
    pub fn exit(&mut self, record: &SyscallRecord) -> io::Result<()> {
        writeln!(self.out, " = {}", RetVal(record.return_value()))?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

// Return values print from the raw register bits, so errors (`-errno`) and other
// negative values keep their two's-complement form. Zero prints bare, without the hex
// prefix.
struct RetVal(Option<i64>);

impl fmt::Display for RetVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            None => write!(f, "?"),
            Some(0) => write!(f, "0"),
            Some(value) => write!(f, "0x{:x}", value as u64),
        }
    }
}
