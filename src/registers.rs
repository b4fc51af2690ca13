use std::cmp::Ordering;
use std::ops::{Index, IndexMut};

/// Number of general purpose registers
pub const REGISTER_COUNT: usize = 8;

/// Stack pointer value of an empty stack
pub const SP_INIT: u8 = 0xF4;

/// Index of a register, built from an operand byte.
///
/// Only the low three bits of the operand select the register, so a `Reg`
/// always addresses one of R0..R7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reg(u8);

impl Reg {
  /// R7 is reserved as the stack pointer
  pub const SP: Reg = Reg(7);

  pub fn index(self) -> usize {
    self.0 as usize
  }
}

impl From<u8> for Reg {
  fn from(operand: u8) -> Self {
    Self(operand & (REGISTER_COUNT as u8 - 1))
  }
}

/// The eight byte registers of the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers([u8; REGISTER_COUNT]);

impl Registers {
  /// All zero except SP, which points at an empty stack
  pub fn new() -> Self {
    let mut regs = [0; REGISTER_COUNT];
    regs[Reg::SP.index()] = SP_INIT;
    Self(regs)
  }

  pub fn sp(&self) -> u8 {
    self[Reg::SP]
  }

  pub fn set_sp(&mut self, value: u8) {
    self[Reg::SP] = value;
  }

  pub fn as_array(&self) -> &[u8; REGISTER_COUNT] {
    &self.0
  }
}

impl Default for Registers {
  fn default() -> Self {
    Self::new()
  }
}

impl Index<Reg> for Registers {
  type Output = u8;

  fn index(&self, reg: Reg) -> &u8 {
    &self.0[reg.index()]
  }
}

impl IndexMut<Reg> for Registers {
  fn index_mut(&mut self, reg: Reg) -> &mut u8 {
    &mut self.0[reg.index()]
  }
}

/// The FL register. Only comparisons write it and exactly one of the three
/// low bits is set afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags(u8);

impl Flags {
  pub const EQUAL: u8 = 0b001;
  pub const GREATER: u8 = 0b010;
  pub const LESS: u8 = 0b100;

  pub fn from_ordering(ordering: Ordering) -> Self {
    match ordering {
      Ordering::Equal => Self(Self::EQUAL),
      Ordering::Greater => Self(Self::GREATER),
      Ordering::Less => Self(Self::LESS),
    }
  }

  pub fn bits(self) -> u8 {
    self.0
  }

  pub fn is_equal(self) -> bool {
    self.0 & Self::EQUAL != 0
  }

  pub fn is_greater(self) -> bool {
    self.0 & Self::GREATER != 0
  }

  pub fn is_less(self) -> bool {
    self.0 & Self::LESS != 0
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reset_state() {
    let regs = Registers::new();
    assert_eq!(regs.sp(), 0xF4);
    assert_eq!(&regs.as_array()[..7], &[0; 7]);
    assert_eq!(Flags::default().bits(), 0);
  }

  #[test]
  fn reg_masks_operand() {
    assert_eq!(Reg::from(3).index(), 3);
    assert_eq!(Reg::from(7), Reg::SP);
    assert_eq!(Reg::from(0x0B).index(), 3);
    assert_eq!(Reg::from(0xFF), Reg::SP);
  }

  #[test]
  fn index_by_reg() {
    let mut regs = Registers::new();
    regs[Reg::from(2)] = 42;
    assert_eq!(regs[Reg::from(2)], 42);
    regs.set_sp(0x10);
    assert_eq!(regs[Reg::SP], 0x10);
  }

  #[test]
  fn flags_from_ordering() {
    let eq = Flags::from_ordering(Ordering::Equal);
    assert!(eq.is_equal() && !eq.is_greater() && !eq.is_less());
    assert_eq!(Flags::from_ordering(Ordering::Greater).bits(), 0b010);
    assert_eq!(Flags::from_ordering(Ordering::Less).bits(), 0b100);
  }
}
