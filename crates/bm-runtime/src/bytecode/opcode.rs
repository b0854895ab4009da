//! Byte Machine instruction set
//!
//! Twelve opcodes. The numeric tag of each opcode is what the binary
//! program format stores, so the discriminants must never be reordered.

/// Bytecode opcode
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // ===== Control =====
    /// Do nothing
    Nop = 0,

    // ===== Stack manipulation =====
    /// Push the operand
    Push = 1,
    /// Push a copy of the element `operand` positions below the top
    Dup = 2,

    // ===== Arithmetic =====
    /// Pop b, pop a, push a + b
    Plus = 3,
    /// Pop b, pop a, push a - b
    Minus = 4,
    /// Pop b, pop a, push a * b
    Mult = 5,
    /// Pop b, pop a, push a / b
    Div = 6,

    // ===== Control flow =====
    /// Unconditional jump to the operand address
    Jmp = 7,
    /// Pop condition, jump to the operand address if nonzero
    JmpIf = 8,

    // ===== Comparison =====
    /// Pop b, pop a, push a == b
    Eq = 9,

    // ===== Special =====
    /// Stop the machine
    Halt = 10,
    /// Pop and print the top of the stack
    PrintDebug = 11,
}

/// Every opcode, in tag order
pub const ALL_OPCODES: [Opcode; 12] = [
    Opcode::Nop,
    Opcode::Push,
    Opcode::Dup,
    Opcode::Plus,
    Opcode::Minus,
    Opcode::Mult,
    Opcode::Div,
    Opcode::Jmp,
    Opcode::JmpIf,
    Opcode::Eq,
    Opcode::Halt,
    Opcode::PrintDebug,
];

impl Opcode {
    /// Assembly mnemonic
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Nop => "nop",
            Opcode::Push => "push",
            Opcode::Dup => "dup",
            Opcode::Plus => "plus",
            Opcode::Minus => "minus",
            Opcode::Mult => "mult",
            Opcode::Div => "div",
            Opcode::Jmp => "jmp",
            Opcode::JmpIf => "jmp_if",
            Opcode::Eq => "eq",
            Opcode::Halt => "halt",
            Opcode::PrintDebug => "print_debug",
        }
    }

    /// Look up an opcode by its exact (case-sensitive) mnemonic
    pub fn from_mnemonic(name: &str) -> Option<Self> {
        ALL_OPCODES.iter().copied().find(|op| op.mnemonic() == name)
    }

    /// Whether the opcode reads its operand
    pub fn has_operand(self) -> bool {
        matches!(
            self,
            Opcode::Push | Opcode::Dup | Opcode::Jmp | Opcode::JmpIf
        )
    }

    /// Binary tag
    pub fn tag(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for Opcode {
    type Error = ();

    fn try_from(tag: u32) -> Result<Self, Self::Error> {
        ALL_OPCODES.get(tag as usize).copied().ok_or(())
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}
