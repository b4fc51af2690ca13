//! Arithmetic and logic unit.
//!
//! Operates on the register file and flags only; program counter and halting
//! are the engine's business.

use crate::registers::{Flags, Reg, Registers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
  Add,
  Sub,
  Mul,
  Div,
  Mod,
  Cmp,
  And,
  Or,
  Xor,
  Not,
  Shl,
  Shr,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluError {
  #[error("divide by zero")]
  DivideByZero,
}

/// Apply `op` to `r[a]` and `r[b]`, writing the result to `r[a]` (or the
/// flags for `Cmp`). `r[b]` is never written.
///
/// On error nothing is modified.
pub fn apply(
  op: AluOp,
  regs: &mut Registers,
  flags: &mut Flags,
  a: Reg,
  b: Reg,
) -> Result<(), AluError> {
  let x = regs[a];
  let y = regs[b];
  let result = match op {
    AluOp::Add => x.wrapping_add(y),
    AluOp::Sub => x.wrapping_sub(y),
    AluOp::Mul => x.wrapping_mul(y),
    AluOp::Div => x.checked_div(y).ok_or(AluError::DivideByZero)?,
    AluOp::Mod => x.checked_rem(y).ok_or(AluError::DivideByZero)?,
    AluOp::Cmp => {
      *flags = Flags::from_ordering(x.cmp(&y));
      return Ok(());
    }
    AluOp::And => x & y,
    AluOp::Or => x | y,
    AluOp::Xor => x ^ y,
    AluOp::Not => !x,
    // shifting every bit out leaves zero
    AluOp::Shl => x.checked_shl(y as u32).unwrap_or(0),
    AluOp::Shr => x.checked_shr(y as u32).unwrap_or(0),
  };
  regs[a] = result;
  Ok(())
}
