use anyhow::Result;
use pretty_assertions::assert_eq;

use tracelet::{Reporter, SyscallRecord};
use tracelet::syscalls;

// Render both decorations of `record` into a string.
fn render(record: &SyscallRecord) -> Result<String> {
    let mut report = Reporter::new(Vec::new());

    report.enter(record)?;
    report.exit(record)?;

    let out = String::from_utf8(report.into_inner())?;
    Ok(out)
}

#[test]
fn test_zero_renders_bare() -> Result<()> {
    let record = SyscallRecord::open(12).close(0);

    assert_eq!(render(&record)?, "brk(...) = 0\n");

    Ok(())
}

#[test]
fn test_nonzero_renders_hex() -> Result<()> {
    let record = SyscallRecord::open(0).close(5);

    assert_eq!(render(&record)?, "read(...) = 0x5\n");

    Ok(())
}

#[test]
fn test_negative_renders_raw_bits() -> Result<()> {
    // -2 is `-ENOENT`, as a failing `open` would return. No truncation: all 64 bits of
    // the register appear.
    let record = SyscallRecord::open(2).close(-2);

    assert_eq!(render(&record)?, "open(...) = 0xfffffffffffffffe\n");

    Ok(())
}

#[test]
fn test_open_record_renders_question_mark() -> Result<()> {
    // A record never closed, like a call the tracee died inside of.
    let record = SyscallRecord::open(231);

    assert_eq!(record.return_value(), None);
    assert_eq!(render(&record)?, "exit_group(...) = ?\n");

    Ok(())
}

#[test]
fn test_lines_accumulate_per_record() -> Result<()> {
    let mut report = Reporter::new(Vec::new());

    let read = SyscallRecord::open(0).close(42);
    report.enter(&read)?;
    report.exit(&read)?;

    let exit_group = SyscallRecord::open(231);
    report.enter(&exit_group)?;
    report.exit(&exit_group)?;

    let out = String::from_utf8(report.into_inner())?;
    assert_eq!(out, "read(...) = 0x2a\nexit_group(...) = ?\n");

    Ok(())
}

#[test]
fn test_known_names_resolve() {
    assert_eq!(syscalls::name(0), "read");
    assert_eq!(syscalls::name(59), "execve");
    assert_eq!(syscalls::name(231), "exit_group");
    assert_eq!(syscalls::name(334), "rseq");
}

#[test]
fn test_out_of_range_resolves_to_sentinel() {
    assert_eq!(syscalls::name(335), syscalls::UNKNOWN);
    assert_eq!(syscalls::name(u64::MAX), syscalls::UNKNOWN);

    // The record keeps the raw number even when no name exists for it.
    let record = SyscallRecord::open(9999);
    assert_eq!(record.number(), 9999);
    assert_eq!(record.name(), "unknown");
}
