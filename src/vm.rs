use std::io::{self, Write};

use crate::alu::{self, AluError};
use crate::loader::LoadError;
use crate::memory::Memory;
use crate::opcode::{Instruction, Opcode};
use crate::region::Region;
use crate::registers::{Flags, Reg, Registers};
use crate::trace::Trace;

/// Line written to the output when a program divides by zero
pub const DIVIDE_BY_ZERO: &str = "Divide by Zero Error!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
  Running,
  Halted,
}

/// What to do when the byte at PC is not a known opcode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownOpcode {
  /// Do nothing and leave PC where it is. The machine spins on the byte
  /// forever unless a step limit is set.
  #[default]
  Stall,
  /// Stop with [`Error::UnknownOpcode`].
  Fault,
}

/// Host-side knobs; none of them change how a well-formed program runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
  pub unknown_opcode: UnknownOpcode,
  /// Give up with [`Error::StepLimit`] after this many cycles
  pub max_steps: Option<u64>,
  /// Print a [`Trace`] line to stderr before every cycle
  pub trace: bool,
}

/// An error that stopped execution
#[derive(thiserror::Error, Debug)]
pub enum Error {
  #[error("machine is halted")]
  MachineHalted,

  #[error("unknown opcode {opcode:#04x} at address {pc:#04x}")]
  UnknownOpcode { opcode: u8, pc: u8 },

  #[error("no halt after {0} steps")]
  StepLimit(u64),

  #[error("failed to write program output")]
  Output(#[from] io::Error),
}

/// The LS-8 machine: RAM, registers, flags and program counter.
#[derive(Debug, Clone)]
pub struct Vm {
  pc: u8,
  memory: Memory,
  registers: Registers,
  flags: Flags,
  state: State,
  config: Config,
}

impl Vm {
  /// Create a machine in its reset state
  pub fn new() -> Self {
    Self::with_config(Config::default())
  }

  pub fn with_config(config: Config) -> Self {
    Self {
      pc: 0,
      memory: Memory::new(),
      registers: Registers::new(),
      flags: Flags::default(),
      state: State::Running,
      config,
    }
  }

  /// Put everything back to the reset state, keeping the configuration
  pub fn reset(&mut self) {
    *self = Self::with_config(self.config);
  }

  /// Copy a program image into RAM at address 0
  pub fn load<R>(&mut self, region: &R) -> Result<(), LoadError>
  where
    R: Region + ?Sized,
  {
    self.memory.load(region)
  }

  pub fn pc(&self) -> u8 {
    self.pc
  }

  pub fn set_pc(&mut self, pc: u8) {
    self.pc = pc;
  }

  pub fn memory(&self) -> &Memory {
    &self.memory
  }

  pub fn memory_mut(&mut self) -> &mut Memory {
    &mut self.memory
  }

  pub fn registers(&self) -> &Registers {
    &self.registers
  }

  pub fn registers_mut(&mut self) -> &mut Registers {
    &mut self.registers
  }

  pub fn flags(&self) -> Flags {
    self.flags
  }

  pub fn state(&self) -> State {
    self.state
  }

  pub fn is_halted(&self) -> bool {
    self.state == State::Halted
  }

  /// Decrement SP, then store `value` at SP. Over- and underflow are not
  /// detected; SP just wraps.
  pub fn push(&mut self, value: u8) {
    let sp = self.registers.sp().wrapping_sub(1);
    self.registers.set_sp(sp);
    self.memory.write(sp, value);
  }

  /// Read the value at SP, then increment SP
  pub fn pop(&mut self) -> u8 {
    let sp = self.registers.sp();
    let value = self.memory.read(sp);
    self.registers.set_sp(sp.wrapping_add(1));
    value
  }

  /// Execute a single instruction, writing any program output to `out`
  pub fn step<W>(&mut self, out: &mut W) -> Result<State, Error>
  where
    W: Write,
  {
    if self.is_halted() {
      return Err(Error::MachineHalted);
    }
    if self.config.trace {
      eprintln!("{}", Trace(&*self));
    }
    let mut task = Task::new(self, out);
    task.run()?;
    Ok(self.state)
  }

  /// Execute until the machine halts, returning the number of cycles run
  pub fn run<W>(&mut self, out: &mut W) -> Result<u64, Error>
  where
    W: Write,
  {
    let mut steps = 0;
    while !self.is_halted() {
      if self.config.max_steps.is_some_and(|max| steps >= max) {
        return Err(Error::StepLimit(steps));
      }
      self.step(out)?;
      steps += 1;
    }
    Ok(steps)
  }
}

impl Default for Vm {
  fn default() -> Self {
    Self::new()
  }
}

/// A single fetch-decode-execute cycle
struct Task<'vm, 'out, W> {
  vm: &'vm mut Vm,
  out: &'out mut W,
  instruction: Instruction,
  a: u8,
  b: u8,
}

impl<'vm, 'out, W> Task<'vm, 'out, W>
where
  W: Write,
{
  fn new(vm: &'vm mut Vm, out: &'out mut W) -> Self {
    let pc = vm.pc;
    let instruction = vm.memory.read(pc).into();
    // both operands are fetched even when the instruction takes fewer
    let a = vm.memory.read(pc.wrapping_add(1));
    let b = vm.memory.read(pc.wrapping_add(2));
    Self {
      vm,
      out,
      instruction,
      a,
      b,
    }
  }

  #[inline]
  fn reg_a(&self) -> Reg {
    Reg::from(self.a)
  }

  #[inline]
  fn reg_b(&self) -> Reg {
    Reg::from(self.b)
  }

  /// Move PC past the instruction and its operands
  #[inline]
  fn advance(&mut self) {
    let len = self.instruction.operands() + 1;
    self.vm.pc = self.vm.pc.wrapping_add(len);
  }

  fn run(&mut self) -> Result<(), Error> {
    let op = match self.instruction {
      Instruction::Known(op) => op,
      Instruction::Unknown(opcode) => return unknown(self, opcode),
    };
    if let Some(alu_op) = op.alu_op() {
      return compute(self, alu_op);
    }
    let equal = self.vm.flags.is_equal();
    match op {
      Opcode::Ldi => ldi(self),
      Opcode::Prn => prn(self)?,
      Opcode::Push => push(self),
      Opcode::Pop => pop(self),
      Opcode::Call => call(self),
      Opcode::Ret => ret(self),
      Opcode::Jmp => jmp(self),
      Opcode::Jeq => jump_if(self, equal),
      Opcode::Jne => jump_if(self, !equal),
      Opcode::Hlt => hlt(self),
      _ => unreachable!("{op} is an alu operation"),
    }
    Ok(())
  }
}

// r[a] ← vv
fn ldi<W: Write>(task: &mut Task<'_, '_, W>) {
  let a = task.reg_a();
  task.vm.registers[a] = task.b;
  task.advance();
}

// out ← dec(r[a])
fn prn<W: Write>(task: &mut Task<'_, '_, W>) -> Result<(), Error> {
  let value = task.vm.registers[task.reg_a()];
  writeln!(task.out, "{value}")?;
  task.advance();
  Ok(())
}

// r[a] ← r[a] op r[b], or fl ← cmp(r[a], r[b])
fn compute<W: Write>(task: &mut Task<'_, '_, W>, op: alu::AluOp) -> Result<(), Error> {
  let (a, b) = (task.reg_a(), task.reg_b());
  let vm = &mut *task.vm;
  match alu::apply(op, &mut vm.registers, &mut vm.flags, a, b) {
    Ok(()) => task.advance(),
    Err(AluError::DivideByZero) => {
      writeln!(task.out, "{DIVIDE_BY_ZERO}")?;
      task.vm.state = State::Halted;
    }
  }
  Ok(())
}

// sp ← sp − 1; m[sp] ← r[a]
fn push<W: Write>(task: &mut Task<'_, '_, W>) {
  let value = task.vm.registers[task.reg_a()];
  task.vm.push(value);
  task.advance();
}

// r[a] ← m[sp]; sp ← sp + 1
fn pop<W: Write>(task: &mut Task<'_, '_, W>) {
  let value = task.vm.pop();
  let a = task.reg_a();
  task.vm.registers[a] = value;
  task.advance();
}

// sp ← sp − 1; m[sp] ← pc + 2; pc ← r[a]
fn call<W: Write>(task: &mut Task<'_, '_, W>) {
  let ret = task.vm.pc.wrapping_add(2);
  task.vm.push(ret);
  task.vm.pc = task.vm.registers[task.reg_a()];
}

// pc ← m[sp]; sp ← sp + 1
fn ret<W: Write>(task: &mut Task<'_, '_, W>) {
  task.vm.pc = task.vm.pop();
}

// pc ← r[a]
fn jmp<W: Write>(task: &mut Task<'_, '_, W>) {
  task.vm.pc = task.vm.registers[task.reg_a()];
}

fn jump_if<W: Write>(task: &mut Task<'_, '_, W>, condition: bool) {
  if condition {
    jmp(task);
  } else {
    task.advance();
  }
}

fn hlt<W: Write>(task: &mut Task<'_, '_, W>) {
  task.vm.state = State::Halted;
}

fn unknown<W: Write>(task: &mut Task<'_, '_, W>, opcode: u8) -> Result<(), Error> {
  match task.vm.config.unknown_opcode {
    UnknownOpcode::Stall => Ok(()),
    UnknownOpcode::Fault => Err(Error::UnknownOpcode {
      opcode,
      pc: task.vm.pc,
    }),
  }
}
