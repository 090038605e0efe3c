use anyhow::Result;
use ntest::timeout;

use tracelet::{Command, ExitKind, Reporter, Signal, Tracer};

#[test]
#[timeout(2000)]
fn test_missing_target_is_silent() -> Result<()> {
    let cmd = Command::new(vec!["/definitely/not/a/real/binary"])?;

    // The child becomes a tracee before exec, so the spawn itself succeeds.
    let mut tracer = Tracer::spawn(cmd)?;

    let mut report = Reporter::new(Vec::new());
    let exit = tracer.run(&mut report)?;
    eprintln!("tracee exit = {:?}", exit);

    // No image was ever loaded: the launcher's failed exec is not part of any trace,
    // and the child exits with the shell's command-not-found status.
    assert_eq!(exit, ExitKind::Exited { code: 127 });
    assert!(report.into_inner().is_empty());

    Ok(())
}

#[test]
#[timeout(3000)]
fn test_exit_code_forwarded() -> Result<()> {
    let cmd = Command::new(vec!["sh", "-c", "exit 42"])?;
    let mut tracer = Tracer::spawn(cmd)?;

    let mut report = Reporter::new(Vec::new());
    let exit = tracer.run(&mut report)?;
    eprintln!("tracee exit = {:?}", exit);

    assert_eq!(exit, ExitKind::Exited { code: 42 });

    Ok(())
}

#[test]
#[timeout(3000)]
fn test_termination_by_signal() -> Result<()> {
    let cmd = Command::new(vec!["sh", "-c", "kill -KILL $$"])?;
    let mut tracer = Tracer::spawn(cmd)?;

    let mut report = Reporter::new(Vec::new());
    let exit = tracer.run(&mut report)?;
    eprintln!("tracee exit = {:?}", exit);

    assert_eq!(
        exit,
        ExitKind::Signaled { signal: Signal::SIGKILL, core_dumped: false }
    );

    // `SIGKILL` ends the tracee without a further stop, so the call it died inside is
    // closed by the terminal marker.
    let out = String::from_utf8(report.into_inner())?;
    eprint!("{}", out);
    assert!(out.ends_with(" = ?\n"), "unexpected trace tail: {:?}", out);

    Ok(())
}

#[test]
#[timeout(3000)]
fn test_delivered_signal_forwarded() -> Result<()> {
    // `SIGTERM`, unlike `SIGKILL`, stops the tracee for a signal-delivery first. The
    // shell dies from it only if the resume re-delivers it; a swallowed signal would
    // end in a normal `Exited { code: 0 }`.
    let cmd = Command::new(vec!["sh", "-c", "kill -TERM $$"])?;
    let mut tracer = Tracer::spawn(cmd)?;

    let mut report = Reporter::new(Vec::new());
    let exit = tracer.run(&mut report)?;
    eprintln!("tracee exit = {:?}", exit);

    assert_eq!(
        exit,
        ExitKind::Signaled { signal: Signal::SIGTERM, core_dumped: false }
    );

    Ok(())
}

#[test]
#[timeout(2000)]
fn test_argv_forwarded_verbatim() -> Result<()> {
    // `sh` exits with the count of the arguments after `-c cmd`, seen as `$1 $2 $3`.
    let cmd = Command::new(vec!["sh", "-c", "exit $#", "sh", "a", "b", "c"])?;
    let mut tracer = Tracer::spawn(cmd)?;

    let mut report = Reporter::new(Vec::new());
    let exit = tracer.run(&mut report)?;
    eprintln!("tracee exit = {:?}", exit);

    assert_eq!(exit, ExitKind::Exited { code: 3 });

    Ok(())
}
