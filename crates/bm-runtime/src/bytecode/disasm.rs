//! Bytecode disassembler
//!
//! Converts a program back to assembly source, one instruction per line,
//! using the same mnemonics the assembler accepts.

use super::{Instruction, Opcode, Program};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisasmError {
    #[error("illegal opcode tag {tag} at instruction {index}")]
    IllegalOpcode { index: usize, tag: u32 },
}

/// Disassemble a program to assembly lines
///
/// # Format
/// ```text
/// push 12
/// push 21
/// plus
/// jmp_if 0
/// ```
pub fn disassemble(program: &Program) -> Result<Vec<String>, DisasmError> {
    program
        .iter()
        .enumerate()
        .map(|(index, inst)| disassemble_instruction(index, inst))
        .collect()
}

/// Disassemble a program to a newline-terminated listing
pub fn disassemble_to_string(program: &Program) -> Result<String, DisasmError> {
    let mut output = String::new();
    for line in disassemble(program)? {
        output.push_str(&line);
        output.push('\n');
    }
    Ok(output)
}

/// Render one instruction
fn disassemble_instruction(index: usize, inst: &Instruction) -> Result<String, DisasmError> {
    let opcode = inst.opcode().ok_or(DisasmError::IllegalOpcode {
        index,
        tag: inst.tag(),
    })?;

    Ok(format_instruction(opcode, inst))
}

fn format_instruction(opcode: Opcode, inst: &Instruction) -> String {
    if opcode.has_operand() {
        format!("{} {}", opcode.mnemonic(), inst.operand())
    } else {
        opcode.mnemonic().to_string()
    }
}
