//! Disasm command - print a binary program as assembly

use anyhow::Result;
use bm_runtime::{disassemble, Program};
use std::io::Write;
use std::path::Path;

/// Disassemble `input`, one instruction per line
pub fn run<W: Write>(input: &Path, program_capacity: usize, out: &mut W) -> Result<()> {
    let program = Program::load_from_file(input, program_capacity)?;
    for line in disassemble(&program)? {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}
