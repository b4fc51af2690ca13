//! Emulator for the LS-8, a tiny 8-bit machine with eight byte registers,
//! 256 bytes of RAM and a downward growing stack.
//!
//! Programs are plain text files, one instruction or operand byte per line
//! written in binary, e.g. `10000010 # LDI R0,8`.

pub mod alu;
pub mod loader;
pub mod memory;
pub mod opcode;
pub mod region;
pub mod registers;
pub mod trace;
pub mod vm;
