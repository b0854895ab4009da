//! Machine word and runtime fault types

use thiserror::Error;

/// The machine word: the only value type on the stack and the only operand type.
pub type Word = i64;

/// Recoverable fault raised by a single execution step.
///
/// Faults belong to the machine, not to the toolchain: the embedding caller
/// decides whether to keep running, abort, or report them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Fault {
    /// Push onto a full stack
    #[error("Stack overflow")]
    StackOverflow,
    /// Not enough operands on the stack
    #[error("Stack underflow")]
    StackUnderflow,
    /// Instruction tag outside the instruction set
    #[error("Illegal instruction")]
    IllegalInstruction,
    /// Operand out of the range the opcode accepts
    #[error("Illegal operand")]
    IllegalOperand,
    /// Division with a zero divisor
    #[error("Division by zero")]
    DivisionByZero,
    /// Instruction pointer outside the loaded program
    #[error("Illegal instruction access")]
    IllegalInstructionAccess,
}

impl Fault {
    /// Stable error code, as printed by the command line tools
    pub fn code(&self) -> &'static str {
        match self {
            Fault::StackOverflow => "ERR_STACK_OVERFLOW",
            Fault::StackUnderflow => "ERR_STACK_UNDERFLOW",
            Fault::IllegalInstruction => "ERR_ILLEGAL_INST",
            Fault::IllegalOperand => "ERR_ILLEGAL_OPERAND",
            Fault::DivisionByZero => "ERR_DIV_BY_ZERO",
            Fault::IllegalInstructionAccess => "ERR_ILLEGAL_INST_ACCESS",
        }
    }
}
