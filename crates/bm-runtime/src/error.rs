//! Toolchain errors
//!
//! Failures of the assembler, disassembler and program store. These are
//! fatal to the invoking tool and are never represented as a [`Fault`].
//!
//! [`Fault`]: crate::value::Fault

use crate::assembler::AsmError;
use crate::bytecode::disasm::DisasmError;
use crate::bytecode::serialize::CodecError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolchainError {
    #[error("could not access file `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed program file `{}`: {source}", path.display())]
    Codec { path: PathBuf, source: CodecError },

    #[error(transparent)]
    Translate(#[from] AsmError),

    #[error(transparent)]
    Disassemble(#[from] DisasmError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::Program;
    use std::path::Path;

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Program::load_from_file(Path::new("definitely/not/here.bm"), 16).unwrap_err();
        assert!(matches!(err, ToolchainError::Io { .. }));
        assert!(err.to_string().contains("definitely/not/here.bm"));
    }

    #[test]
    fn test_codec_error_message_names_file() {
        let err = ToolchainError::Codec {
            path: PathBuf::from("prog.bm"),
            source: CodecError::Misaligned {
                len: 17,
                record_size: 16,
            },
        };
        assert_eq!(
            err.to_string(),
            "malformed program file `prog.bm`: file size 17 is not a multiple of the 16-byte instruction record"
        );
    }
}
