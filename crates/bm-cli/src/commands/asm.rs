//! Asm command - translate assembly source to a binary program

use anyhow::{Context, Result};
use bm_runtime::translate_source;
use std::fs;
use std::path::Path;

/// Assemble `input` and write the binary program to `output`
pub fn run(input: &Path, output: &Path, program_capacity: usize) -> Result<()> {
    let source = fs::read_to_string(input)
        .with_context(|| format!("Failed to read source file: {}", input.display()))?;

    let program = translate_source(&source, program_capacity)
        .with_context(|| format!("Failed to assemble {}", input.display()))?;

    program.save_to_file(output)?;
    log::info!(
        "assembled {} instructions into {}",
        program.len(),
        output.display()
    );
    Ok(())
}
