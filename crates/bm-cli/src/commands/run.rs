//! Run command - execute a binary program

use anyhow::{Context, Result};
use bm_config::MachineConfig;
use bm_runtime::{Fault, Machine};
use std::io::{self, Write};
use std::path::Path;

/// Result of a completed run
#[derive(Debug)]
pub struct RunOutcome {
    /// Fault that stopped execution, if any
    pub fault: Option<Fault>,
}

/// Load and execute `input`, then dump the stack to stdout
pub fn run(input: &Path, config: &MachineConfig, limit: i64) -> Result<RunOutcome> {
    let mut machine = Machine::with_config(config);
    machine.load_program_from_file(input)?;

    execute(&mut machine, limit, &mut io::stdout())
}

/// Execute a loaded machine and write the stack dump to `out`
pub fn execute<W: Write>(machine: &mut Machine, limit: i64, out: &mut W) -> Result<RunOutcome> {
    let fault = machine.execute_program(limit).err();

    // print_debug output shares stdout with the dump
    io::stdout().flush().context("Failed to flush stdout")?;
    machine
        .dump_stack(out)
        .and_then(|()| out.flush())
        .context("Failed to write stack dump")?;

    Ok(RunOutcome { fault })
}
