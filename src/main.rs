//! Trace a single target program, printing one line per syscall to stdout.
//!
//! Diagnostics go to stderr, controlled by `RUST_LOG`.

use std::env;
use std::io;
use std::os::unix::ffi::OsStringExt;

use anyhow::bail;
use tracing::debug;

use tracelet::{Command, Reporter, Tracer};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
        )
        .with_writer(io::stderr)
        .init();

    // Raw bytes, not `String`: the target's argv is forwarded verbatim.
    let argv: Vec<Vec<u8>> = env::args_os()
        .skip(1)
        .map(OsStringExt::into_vec)
        .collect();

    if argv.is_empty() {
        bail!("usage: tracelet <program> [args...]");
    }

    let cmd = Command::new(argv)?;
    let mut tracer = Tracer::spawn(cmd)?;

    let mut report = Reporter::new(io::stdout().lock());
    let exit = tracer.run(&mut report)?;

    debug!(?exit, "target terminated");

    Ok(())
}
