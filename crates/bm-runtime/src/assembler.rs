//! Assembler: assembly text to bytecode
//!
//! # Syntax
//!
//! ```text
//! mnemonic [operand]  # optional comment
//! ```
//!
//! - One instruction per line
//! - Mnemonics are lowercase and matched exactly (`push`, `jmp_if`, ...)
//! - Operands are unsigned decimal integers; parsing stops at the first
//!   non-digit, and a missing operand reads as 0
//! - Blank lines and lines starting with `#` are skipped

use crate::bytecode::{Instruction, Opcode, Program};
use crate::text::TextSpan;
use thiserror::Error;

const COMMENT_CHAR: char = '#';

/// Translation failures. These abort the whole translation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AsmError {
    #[error("unknown instruction `{name}`")]
    UnknownInstruction { name: String },

    #[error("line {line}: {error}")]
    AtLine { line: usize, error: Box<AsmError> },

    #[error("program too large: more than {capacity} instructions")]
    ProgramTooLarge { capacity: usize },
}

impl AsmError {
    fn at_line(self, line: usize) -> Self {
        match self {
            AsmError::AtLine { .. } => self,
            other => AsmError::AtLine {
                line,
                error: Box::new(other),
            },
        }
    }

    /// 1-based source line of the failure, if known
    pub fn line(&self) -> Option<usize> {
        match self {
            AsmError::AtLine { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Translate one source line into an instruction
pub fn translate_line(line: TextSpan<'_>) -> Result<Instruction, AsmError> {
    let mut line = line.trim_left();
    let name = line.chop_by_delim(' ');
    let operand = line.chop_by_delim(COMMENT_CHAR).trim();

    let opcode =
        Opcode::from_mnemonic(name.as_str()).ok_or_else(|| AsmError::UnknownInstruction {
            name: name.to_string(),
        })?;

    let operand = if opcode.has_operand() {
        operand.to_int()
    } else {
        0
    };

    Ok(Instruction::new(opcode, operand))
}

/// Translate a whole source buffer into a program of at most `capacity`
/// instructions
pub fn translate_source(source: &str, capacity: usize) -> Result<Program, AsmError> {
    let mut program = Program::with_capacity(capacity);

    for (index, raw) in source.split('\n').enumerate() {
        let line = TextSpan::new(raw).trim();
        if line.is_empty() || line.first_char() == Some(COMMENT_CHAR) {
            continue;
        }

        let inst = translate_line(line).map_err(|e| e.at_line(index + 1))?;
        program
            .push(inst)
            .map_err(|e| AsmError::ProgramTooLarge { capacity: e.capacity }.at_line(index + 1))?;
    }

    log::debug!("translated {} instructions", program.len());
    Ok(program)
}
