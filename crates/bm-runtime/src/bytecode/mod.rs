//! Bytecode model
//!
//! A program is a bounded array of fixed-size instructions. Each instruction
//! is an opcode tag plus one word operand; the operand is only meaningful for
//! `push`, `dup`, `jmp` and `jmp_if`.

pub mod disasm;
mod opcode;
pub mod serialize;

pub use opcode::{Opcode, ALL_OPCODES};

use crate::error::ToolchainError;
use crate::value::Word;
use serialize::{NativeCodec, ProgramCodec};
use std::path::Path;
use thiserror::Error;

/// Default maximum number of instructions in a program
pub const PROGRAM_CAPACITY: usize = bm_config::DEFAULT_PROGRAM_CAPACITY;

/// A single instruction
///
/// The opcode is kept as its raw tag so that a program decoded from a
/// corrupted file still loads; the bad tag only surfaces when the machine
/// fetches it (as `Fault::IllegalInstruction`) or when it is disassembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction {
    tag: u32,
    operand: Word,
}

impl Instruction {
    /// Create an instruction with an operand
    pub const fn new(opcode: Opcode, operand: Word) -> Self {
        Self {
            tag: opcode as u32,
            operand,
        }
    }

    /// Create an instruction from a raw tag, valid or not
    pub const fn from_raw(tag: u32, operand: Word) -> Self {
        Self { tag, operand }
    }

    pub const fn nop() -> Self {
        Self::new(Opcode::Nop, 0)
    }

    pub const fn push(value: Word) -> Self {
        Self::new(Opcode::Push, value)
    }

    pub const fn dup(depth: Word) -> Self {
        Self::new(Opcode::Dup, depth)
    }

    pub const fn plus() -> Self {
        Self::new(Opcode::Plus, 0)
    }

    pub const fn minus() -> Self {
        Self::new(Opcode::Minus, 0)
    }

    pub const fn mult() -> Self {
        Self::new(Opcode::Mult, 0)
    }

    pub const fn div() -> Self {
        Self::new(Opcode::Div, 0)
    }

    pub const fn jmp(addr: Word) -> Self {
        Self::new(Opcode::Jmp, addr)
    }

    pub const fn jmp_if(addr: Word) -> Self {
        Self::new(Opcode::JmpIf, addr)
    }

    pub const fn eq() -> Self {
        Self::new(Opcode::Eq, 0)
    }

    pub const fn halt() -> Self {
        Self::new(Opcode::Halt, 0)
    }

    pub const fn print_debug() -> Self {
        Self::new(Opcode::PrintDebug, 0)
    }

    /// Decoded opcode, `None` if the tag is outside the instruction set
    pub fn opcode(&self) -> Option<Opcode> {
        Opcode::try_from(self.tag).ok()
    }

    /// Raw opcode tag
    pub fn tag(&self) -> u32 {
        self.tag
    }

    pub fn operand(&self) -> Word {
        self.operand
    }
}

/// Returned when an instruction is appended to a full program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("program capacity of {capacity} instructions exceeded")]
pub struct CapacityExceeded {
    pub capacity: usize,
}

/// Bounded instruction sequence
///
/// Invariant: `len() <= capacity()`.
#[derive(Debug, Clone)]
pub struct Program {
    instructions: Vec<Instruction>,
    capacity: usize,
}

impl Program {
    /// Create an empty program with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(PROGRAM_CAPACITY)
    }

    /// Create an empty program holding at most `capacity` instructions
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instructions: Vec::with_capacity(capacity.min(PROGRAM_CAPACITY)),
            capacity,
        }
    }

    /// Build a program from a slice, failing if it does not fit
    pub fn from_instructions(
        instructions: &[Instruction],
        capacity: usize,
    ) -> Result<Self, CapacityExceeded> {
        if instructions.len() > capacity {
            return Err(CapacityExceeded { capacity });
        }
        Ok(Self {
            instructions: instructions.to_vec(),
            capacity,
        })
    }

    /// Append an instruction
    pub fn push(&mut self, instruction: Instruction) -> Result<(), CapacityExceeded> {
        if self.is_full() {
            return Err(CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.instructions.push(instruction);
        Ok(())
    }

    /// Fetch the instruction at a machine address
    ///
    /// Returns `None` for negative or out-of-range addresses.
    pub fn fetch(&self, ip: Word) -> Option<Instruction> {
        usize::try_from(ip)
            .ok()
            .and_then(|index| self.instructions.get(index))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.instructions.len() >= self.capacity
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// Load a program from a binary file in the native record format
    pub fn load_from_file(path: &Path, capacity: usize) -> Result<Self, ToolchainError> {
        Self::load_from_file_with(&NativeCodec, path, capacity)
    }

    /// Load a program from a binary file using the given codec
    pub fn load_from_file_with<C: ProgramCodec>(
        codec: &C,
        path: &Path,
        capacity: usize,
    ) -> Result<Self, ToolchainError> {
        let bytes = std::fs::read(path).map_err(|source| ToolchainError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let program = codec
            .decode(&bytes, capacity)
            .map_err(|source| ToolchainError::Codec {
                path: path.to_path_buf(),
                source,
            })?;
        log::debug!(
            "loaded {} instructions from {}",
            program.len(),
            path.display()
        );
        Ok(program)
    }

    /// Save the program to a binary file in the native record format
    pub fn save_to_file(&self, path: &Path) -> Result<(), ToolchainError> {
        self.save_to_file_with(&NativeCodec, path)
    }

    /// Save the program to a binary file using the given codec
    pub fn save_to_file_with<C: ProgramCodec>(
        &self,
        codec: &C,
        path: &Path,
    ) -> Result<(), ToolchainError> {
        std::fs::write(path, codec.encode(self)).map_err(|source| ToolchainError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("saved {} instructions to {}", self.len(), path.display());
        Ok(())
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

/// Programs are equal when they hold the same instruction sequence;
/// capacity is a loading limit, not part of the program.
impl PartialEq for Program {
    fn eq(&self, other: &Self) -> bool {
        self.instructions == other.instructions
    }
}

impl Eq for Program {}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}
