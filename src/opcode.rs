use std::fmt;

use crate::alu::AluOp;

/// Bits of the instruction byte above this shift hold the operand count
const OPERAND_SHIFT: u8 = 6;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
  /// Halts the machine.
  ///
  /// | Operation | Semantics/RTL      | Assembly |
  /// |-----------|--------------------|----------|
  /// | Halt      | `(stop execution)` | `HLT`    |
  Hlt = 0b0000_0001,

  /// Returns from a subroutine.
  ///
  /// | Operation | Semantics/RTL                    | Assembly |
  /// |-----------|----------------------------------|----------|
  /// | Return    | `pc ← m[sp]; sp ← sp + 1`        | `RET`    |
  Ret = 0b0001_0001,

  /// | Operation | Semantics/RTL              | Assembly  |
  /// |-----------|----------------------------|-----------|
  /// | Push      | `sp ← sp − 1; m[sp] ← r[a]` | `PUSH ra` |
  Push = 0b0100_0101,

  /// | Operation | Semantics/RTL              | Assembly |
  /// |-----------|----------------------------|----------|
  /// | Pop       | `r[a] ← m[sp]; sp ← sp + 1` | `POP ra` |
  Pop = 0b0100_0110,

  /// Prints a register as a decimal number on its own line.
  ///
  /// | Operation | Semantics/RTL      | Assembly |
  /// |-----------|--------------------|----------|
  /// | Print     | `out ← dec(r[a])`  | `PRN ra` |
  Prn = 0b0100_0111,

  /// Calls the subroutine whose address is held in a register.
  ///
  /// | Operation | Semantics/RTL                                 | Assembly  |
  /// |-----------|-----------------------------------------------|-----------|
  /// | Call      | `sp ← sp − 1; m[sp] ← pc + 2; pc ← r[a]`       | `CALL ra` |
  Call = 0b0101_0000,

  /// | Operation | Semantics/RTL | Assembly |
  /// |-----------|---------------|----------|
  /// | Jump      | `pc ← r[a]`   | `JMP ra` |
  Jmp = 0b0101_0100,

  /// | Operation     | Semantics/RTL              | Assembly |
  /// |---------------|----------------------------|----------|
  /// | Jump if equal | `if fl.E : pc ← r[a]`      | `JEQ ra` |
  Jeq = 0b0101_0101,

  /// | Operation         | Semantics/RTL          | Assembly |
  /// |-------------------|------------------------|----------|
  /// | Jump if not equal | `if !fl.E : pc ← r[a]` | `JNE ra` |
  Jne = 0b0101_0110,

  /// | Operation   | Semantics/RTL   | Assembly |
  /// |-------------|-----------------|----------|
  /// | Logical NOT | `r[a] ← ~r[a]`  | `NOT ra` |
  Not = 0b0110_1001,

  /// Loads an immediate value into a register.
  ///
  /// | Operation      | Semantics/RTL | Assembly      |
  /// |----------------|---------------|---------------|
  /// | Load Immediate | `r[a] ← vv`   | `LDI ra, vv`  |
  Ldi = 0b1000_0010,

  /// | Operation | Semantics/RTL         | Assembly     |
  /// |-----------|-----------------------|--------------|
  /// | Add       | `r[a] ← r[a] + r[b]`  | `ADD ra, rb` |
  Add = 0b1010_0000,

  /// | Operation | Semantics/RTL         | Assembly     |
  /// |-----------|-----------------------|--------------|
  /// | Subtract  | `r[a] ← r[a] − r[b]`  | `SUB ra, rb` |
  Sub = 0b1010_0001,

  /// | Operation | Semantics/RTL         | Assembly     |
  /// |-----------|-----------------------|--------------|
  /// | Multiply  | `r[a] ← r[a] × r[b]`  | `MUL ra, rb` |
  Mul = 0b1010_0010,

  /// | Operation | Semantics/RTL         | Assembly     |
  /// |-----------|-----------------------|--------------|
  /// | Divide    | `r[a] ← r[a] ÷ r[b]`  | `DIV ra, rb` |
  Div = 0b1010_0011,

  /// | Operation | Semantics/RTL           | Assembly     |
  /// |-----------|-------------------------|--------------|
  /// | Modulo    | `r[a] ← r[a] mod r[b]`  | `MOD ra, rb` |
  Mod = 0b1010_0100,

  /// Compares two registers, overwriting the flags.
  ///
  /// | Operation | Semantics/RTL                 | Assembly     |
  /// |-----------|-------------------------------|--------------|
  /// | Compare   | `fl ← cmp(r[a], r[b])`        | `CMP ra, rb` |
  Cmp = 0b1010_0111,

  /// | Operation   | Semantics/RTL         | Assembly     |
  /// |-------------|-----------------------|--------------|
  /// | Logical AND | `r[a] ← r[a] & r[b]`  | `AND ra, rb` |
  And = 0b1010_1000,

  /// | Operation  | Semantics/RTL          | Assembly    |
  /// |------------|------------------------|-------------|
  /// | Logical OR | `r[a] ← r[a] \| r[b]`  | `OR ra, rb` |
  Or = 0b1010_1010,

  /// | Operation   | Semantics/RTL         | Assembly     |
  /// |-------------|-----------------------|--------------|
  /// | Logical XOR | `r[a] ← r[a] ^ r[b]`  | `XOR ra, rb` |
  Xor = 0b1010_1011,

  /// | Operation  | Semantics/RTL          | Assembly     |
  /// |------------|------------------------|--------------|
  /// | Shift Left | `r[a] ← r[a] << r[b]`  | `SHL ra, rb` |
  Shl = 0b1010_1100,

  /// | Operation   | Semantics/RTL          | Assembly     |
  /// |-------------|------------------------|--------------|
  /// | Shift Right | `r[a] ← r[a] >> r[b]`  | `SHR ra, rb` |
  Shr = 0b1010_1101,
}

impl Opcode {
  pub const ALL: [Opcode; 22] = [
    Self::Hlt,
    Self::Ret,
    Self::Push,
    Self::Pop,
    Self::Prn,
    Self::Call,
    Self::Jmp,
    Self::Jeq,
    Self::Jne,
    Self::Not,
    Self::Ldi,
    Self::Add,
    Self::Sub,
    Self::Mul,
    Self::Div,
    Self::Mod,
    Self::Cmp,
    Self::And,
    Self::Or,
    Self::Xor,
    Self::Shl,
    Self::Shr,
  ];

  pub fn byte(self) -> u8 {
    self as u8
  }

  /// Number of operand bytes following this opcode in memory
  pub fn operands(self) -> u8 {
    operand_count(self.byte())
  }

  pub fn mnemonic(self) -> &'static str {
    match self {
      Self::Hlt => "HLT",
      Self::Ret => "RET",
      Self::Push => "PUSH",
      Self::Pop => "POP",
      Self::Prn => "PRN",
      Self::Call => "CALL",
      Self::Jmp => "JMP",
      Self::Jeq => "JEQ",
      Self::Jne => "JNE",
      Self::Not => "NOT",
      Self::Ldi => "LDI",
      Self::Add => "ADD",
      Self::Sub => "SUB",
      Self::Mul => "MUL",
      Self::Div => "DIV",
      Self::Mod => "MOD",
      Self::Cmp => "CMP",
      Self::And => "AND",
      Self::Or => "OR",
      Self::Xor => "XOR",
      Self::Shl => "SHL",
      Self::Shr => "SHR",
    }
  }

  /// The ALU operation this opcode is executed by, if any
  pub fn alu_op(self) -> Option<AluOp> {
    let op = match self {
      Self::Add => AluOp::Add,
      Self::Sub => AluOp::Sub,
      Self::Mul => AluOp::Mul,
      Self::Div => AluOp::Div,
      Self::Mod => AluOp::Mod,
      Self::Cmp => AluOp::Cmp,
      Self::And => AluOp::And,
      Self::Or => AluOp::Or,
      Self::Xor => AluOp::Xor,
      Self::Not => AluOp::Not,
      Self::Shl => AluOp::Shl,
      Self::Shr => AluOp::Shr,
      _ => return None,
    };
    Some(op)
  }
}

impl fmt::Display for Opcode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.mnemonic())
  }
}

impl TryFrom<u8> for Opcode {
  type Error = u8;

  fn try_from(byte: u8) -> Result<Self, Self::Error> {
    Self::ALL
      .iter()
      .copied()
      .find(|op| op.byte() == byte)
      .ok_or(byte)
  }
}

/// A decoded instruction byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
  Known(Opcode),
  Unknown(u8),
}

impl Instruction {
  pub fn byte(self) -> u8 {
    match self {
      Self::Known(op) => op.byte(),
      Self::Unknown(byte) => byte,
    }
  }

  pub fn operands(self) -> u8 {
    operand_count(self.byte())
  }
}

impl From<u8> for Instruction {
  fn from(byte: u8) -> Self {
    match Opcode::try_from(byte) {
      Ok(op) => Self::Known(op),
      Err(byte) => Self::Unknown(byte),
    }
  }
}

impl fmt::Display for Instruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Known(op) => write!(f, "{op}"),
      Self::Unknown(byte) => write!(f, "??({byte:02X})"),
    }
  }
}

/// Operand count encoded in the top two bits of an instruction byte
pub fn operand_count(byte: u8) -> u8 {
  byte >> OPERAND_SHIFT
}
