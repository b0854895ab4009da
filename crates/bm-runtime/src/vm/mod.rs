//! Stack-based interpreter
//!
//! The machine executes one [`Instruction`] per step against a bounded
//! [`Stack`]. Every step either succeeds or returns a [`Fault`]; a faulting
//! step leaves the machine exactly as it was before the step.

mod stack;

pub use stack::{Stack, STACK_CAPACITY};

use crate::bytecode::{CapacityExceeded, Instruction, Opcode, Program};
use crate::error::ToolchainError;
use crate::value::{Fault, Word};
use bm_config::MachineConfig;
use std::io::{self, Write};
use std::path::Path;

/// Destination for `print_debug` output
pub type OutputWriter = Box<dyn Write>;

/// Virtual machine state
pub struct Machine {
    /// Operand stack
    stack: Stack,
    /// Loaded program
    program: Program,
    /// Index of the next instruction to execute
    ip: Word,
    /// Set by `halt`; never cleared by execution
    halted: bool,
    /// Where `print_debug` writes (stdout by default)
    output_writer: OutputWriter,
}

impl Machine {
    /// Create a machine with the default limits and an empty program
    pub fn new() -> Self {
        Self::with_config(&MachineConfig::default())
    }

    /// Create a machine with explicit limits
    pub fn with_config(config: &MachineConfig) -> Self {
        Self {
            stack: Stack::with_capacity(config.stack_capacity),
            program: Program::with_capacity(config.program_capacity),
            ip: 0,
            halted: false,
            output_writer: Box::new(io::stdout()),
        }
    }

    /// Redirect `print_debug` output
    pub fn set_output_writer(&mut self, writer: OutputWriter) {
        self.output_writer = writer;
    }

    /// Replace the loaded program and reset execution state
    ///
    /// The machine keeps its configured program capacity; a longer program
    /// is rejected and the current one stays loaded.
    pub fn load_program(&mut self, program: Program) -> Result<(), CapacityExceeded> {
        self.load_program_from_memory(program.instructions())
    }

    /// Load a program from an instruction slice
    ///
    /// Fails when the slice exceeds the machine's program capacity.
    pub fn load_program_from_memory(
        &mut self,
        instructions: &[Instruction],
    ) -> Result<(), CapacityExceeded> {
        let program = Program::from_instructions(instructions, self.program.capacity())?;
        self.install(program);
        Ok(())
    }

    /// Load a program from a binary file
    pub fn load_program_from_file(&mut self, path: &Path) -> Result<(), ToolchainError> {
        let program = Program::load_from_file(path, self.program.capacity())?;
        self.install(program);
        Ok(())
    }

    /// `program` must already be bounded by the machine's capacity
    fn install(&mut self, program: Program) {
        self.program = program;
        self.reset();
    }

    /// Clear the stack, rewind `ip` and clear the halted flag
    pub fn reset(&mut self) {
        self.stack = Stack::with_capacity(self.stack.capacity());
        self.ip = 0;
        self.halted = false;
    }

    /// Execute a single instruction
    pub fn execute_instruction(&mut self) -> Result<(), Fault> {
        let inst = self
            .program
            .fetch(self.ip)
            .ok_or(Fault::IllegalInstructionAccess)?;
        let opcode = inst.opcode().ok_or(Fault::IllegalInstruction)?;

        log::trace!("ip={} {} {}", self.ip, opcode, inst.operand());

        match opcode {
            Opcode::Nop => {
                self.ip += 1;
            }
            Opcode::Push => {
                self.stack.push(inst.operand())?;
                self.ip += 1;
            }
            Opcode::Dup => {
                let depth = inst.operand();
                if self.stack.is_full() {
                    return Err(Fault::StackOverflow);
                }
                if matches!((self.stack.len() as Word).checked_sub(depth), Some(d) if d <= 0) {
                    return Err(Fault::StackUnderflow);
                }
                let depth = usize::try_from(depth).map_err(|_| Fault::IllegalOperand)?;
                let value = self.stack.peek(depth)?;
                self.stack.push(value)?;
                self.ip += 1;
            }
            Opcode::Plus => self.binary_op(|a, b| Ok(a.wrapping_add(b)))?,
            Opcode::Minus => self.binary_op(|a, b| Ok(a.wrapping_sub(b)))?,
            Opcode::Mult => self.binary_op(|a, b| Ok(a.wrapping_mul(b)))?,
            Opcode::Div => self.binary_op(|a, b| {
                if b == 0 {
                    return Err(Fault::DivisionByZero);
                }
                Ok(a.wrapping_div(b))
            })?,
            Opcode::Eq => self.binary_op(|a, b| Ok(Word::from(a == b)))?,
            Opcode::Jmp => {
                self.ip = inst.operand();
            }
            Opcode::JmpIf => {
                let cond = self.stack.pop()?;
                if cond != 0 {
                    self.ip = inst.operand();
                } else {
                    self.ip += 1;
                }
            }
            Opcode::Halt => {
                self.halted = true;
            }
            Opcode::PrintDebug => {
                let value = self.stack.pop()?;
                if let Err(e) = write!(self.output_writer, "{}", value) {
                    log::warn!("print_debug: failed to write output: {}", e);
                }
                self.ip += 1;
            }
        }

        Ok(())
    }

    /// Apply `a OP b` where `b` is the top and `a` the element below it.
    /// The result replaces `a` and `b` is popped.
    #[inline(always)]
    fn binary_op(
        &mut self,
        op: impl FnOnce(Word, Word) -> Result<Word, Fault>,
    ) -> Result<(), Fault> {
        if self.stack.len() < 2 {
            return Err(Fault::StackUnderflow);
        }
        let b = self.stack.peek(0)?;
        let a = self.stack.peek(1)?;
        let result = op(a, b)?;
        self.stack.pop()?;
        self.stack.replace_top(result)?;
        self.ip += 1;
        Ok(())
    }

    /// Run until halted, a fault, or `limit` steps have executed
    ///
    /// A negative `limit` runs without a step bound; `0` executes nothing.
    pub fn execute_program(&mut self, mut limit: i64) -> Result<(), Fault> {
        let mut steps: u64 = 0;
        while limit != 0 && !self.halted {
            if let Err(fault) = self.execute_instruction() {
                log::debug!("fault after {} steps at ip={}: {}", steps, self.ip, fault);
                return Err(fault);
            }
            steps += 1;
            if limit > 0 {
                limit -= 1;
            }
        }
        log::debug!("executed {} steps (halted: {})", steps, self.halted);
        Ok(())
    }

    /// Write the stack contents, bottom first
    ///
    /// ```text
    /// Stack:
    ///   1
    ///   0
    /// ```
    pub fn dump_stack<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Stack:")?;
        if self.stack.is_empty() {
            writeln!(out, "  [empty]")?;
        } else {
            for value in self.stack.as_slice() {
                writeln!(out, "  {}", value)?;
            }
        }
        Ok(())
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn ip(&self) -> Word {
        self.ip
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn program(&self) -> &Program {
        &self.program
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Machine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Machine")
            .field("stack", &self.stack)
            .field("program_len", &self.program.len())
            .field("ip", &self.ip)
            .field("halted", &self.halted)
            .finish()
    }
}
