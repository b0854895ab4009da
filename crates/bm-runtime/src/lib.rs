//! Byte Machine Runtime - core VM and toolchain
//!
//! This library provides the complete Byte Machine implementation:
//! - The value and instruction model
//! - The stack-based interpreter with its fault model
//! - The assembler (text to bytecode) and disassembler (bytecode to text)
//! - The flat binary program format

/// Byte Machine runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Public API modules
pub mod assembler;
pub mod bytecode;
pub mod error;
pub mod text;
pub mod value;
pub mod vm;

// Re-export commonly used types
pub use assembler::{translate_line, translate_source, AsmError};
pub use bytecode::disasm::{disassemble, DisasmError};
pub use bytecode::serialize::{CodecError, NativeCodec, ProgramCodec};
pub use bytecode::{Instruction, Opcode, Program, PROGRAM_CAPACITY};
pub use error::ToolchainError;
pub use text::TextSpan;
pub use value::{Fault, Word};
pub use vm::{Machine, OutputWriter, Stack, STACK_CAPACITY};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoke() {
        assert_eq!(VERSION, "0.1.0");
    }
}
