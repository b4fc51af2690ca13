use std::fmt;

use crate::vm::Vm;

/// One line of machine state for debugging: program counter, the three bytes
/// at PC, then R0..R7, all in hex.
///
/// ```text
/// 00 | 82 00 08 | 00 00 00 00 00 00 00 F4
/// ```
pub struct Trace<'vm>(pub &'vm Vm);

impl fmt::Display for Trace<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let vm = self.0;
    let pc = vm.pc();
    let memory = vm.memory();
    write!(
      f,
      "{:02X} | {:02X} {:02X} {:02X} |",
      pc,
      memory.read(pc),
      memory.read(pc.wrapping_add(1)),
      memory.read(pc.wrapping_add(2)),
    )?;
    for value in vm.registers().as_array() {
      write!(f, " {value:02X}")?;
    }
    Ok(())
  }
}
