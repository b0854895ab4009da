//! Program serialization and deserialization
//!
//! The default format is a flat array of fixed-size records with no header,
//! no magic number and no count field; the instruction count is the file
//! length divided by the record size. Each record mirrors the host's in-memory
//! layout of `{ u32 tag; i64 operand }`:
//!
//! ```text
//! offset 0..4   opcode tag   (u32, native endian)
//! offset 4..8   padding      (zero)
//! offset 8..16  operand      (i64, native endian)
//! ```
//!
//! The format is not portable between hosts of different endianness.

use super::{Instruction, Program};
use crate::value::Word;
use thiserror::Error;

/// Errors produced while decoding a program image
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("file size {len} is not a multiple of the {record_size}-byte instruction record")]
    Misaligned { len: usize, record_size: usize },

    #[error("program has {count} instructions but capacity is {capacity}")]
    TooManyInstructions { count: usize, capacity: usize },
}

/// Encodes programs to bytes and back
///
/// The interpreter and assembler only see `Program`; swapping the on-disk
/// format means providing another implementation of this trait.
pub trait ProgramCodec {
    /// Bytes per encoded instruction
    fn record_size(&self) -> usize;

    /// Number of whole records in `bytes`
    fn record_count(&self, bytes: &[u8]) -> Result<usize, CodecError> {
        let record_size = self.record_size();
        if bytes.len() % record_size != 0 {
            return Err(CodecError::Misaligned {
                len: bytes.len(),
                record_size,
            });
        }
        Ok(bytes.len() / record_size)
    }

    /// Encode a program
    fn encode(&self, program: &Program) -> Vec<u8>;

    /// Decode a program, rejecting images that do not fit in `capacity`
    fn decode(&self, bytes: &[u8], capacity: usize) -> Result<Program, CodecError>;
}

/// Native fixed-record codec
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeCodec;

impl NativeCodec {
    /// Size of one encoded instruction in bytes
    pub const RECORD_SIZE: usize = 16;

    const OPERAND_OFFSET: usize = 8;
}

impl ProgramCodec for NativeCodec {
    fn record_size(&self) -> usize {
        Self::RECORD_SIZE
    }

    fn encode(&self, program: &Program) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(program.len() * Self::RECORD_SIZE);
        for inst in program {
            serialize_instruction(inst, &mut bytes);
        }
        bytes
    }

    fn decode(&self, bytes: &[u8], capacity: usize) -> Result<Program, CodecError> {
        let count = self.record_count(bytes)?;
        if count > capacity {
            return Err(CodecError::TooManyInstructions { count, capacity });
        }

        let instructions: Vec<Instruction> = bytes
            .chunks_exact(Self::RECORD_SIZE)
            .map(deserialize_instruction)
            .collect();

        Program::from_instructions(&instructions, capacity)
            .map_err(|_| CodecError::TooManyInstructions { count, capacity })
    }
}

/// Serialize one instruction record
fn serialize_instruction(inst: &Instruction, bytes: &mut Vec<u8>) {
    bytes.extend_from_slice(&inst.tag().to_ne_bytes());
    bytes.extend_from_slice(&[0u8; 4]); // Padding
    bytes.extend_from_slice(&inst.operand().to_ne_bytes());
}

/// Deserialize one record; `record` is exactly `RECORD_SIZE` bytes
fn deserialize_instruction(record: &[u8]) -> Instruction {
    let mut tag = [0u8; 4];
    tag.copy_from_slice(&record[..4]);
    let mut operand = [0u8; 8];
    operand.copy_from_slice(&record[NativeCodec::OPERAND_OFFSET..NativeCodec::RECORD_SIZE]);
    Instruction::from_raw(u32::from_ne_bytes(tag), Word::from_ne_bytes(operand))
}
