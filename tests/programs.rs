use std::path::PathBuf;
use std::process::Command;

use emulator::loader;
use emulator::vm::{Config, Vm};

fn program_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("programs")
    .join(name)
}

fn run_program(name: &str) -> String {
  let program = loader::load_file(program_path(name)).unwrap();
  let mut vm = Vm::with_config(Config {
    max_steps: Some(10_000),
    ..Config::default()
  });
  vm.load(&program).unwrap();
  let mut out = Vec::new();
  vm.run(&mut out).unwrap();
  assert!(vm.is_halted());
  String::from_utf8(out).unwrap()
}

#[test]
fn print8() {
  assert_eq!(run_program("print8.ls8"), "8\n");
}

#[test]
fn mult() {
  assert_eq!(run_program("mult.ls8"), "72\n");
}

#[test]
fn stack() {
  assert_eq!(run_program("stack.ls8"), "3\n2\n1\n");
}

#[test]
fn call() {
  assert_eq!(run_program("call.ls8"), "20\n30\n36\n60\n");
}

#[test]
fn sctest() {
  assert_eq!(run_program("sctest.ls8"), "1\n1\n");
}

#[test]
fn mixed_lines_load_in_order() {
  let text = "\
garbage
10000010

   00000011 trailing words
#00000001
00101010
";
  let program = loader::parse(text.as_bytes()).unwrap();
  let mut vm = Vm::new();
  vm.load(&program).unwrap();
  assert_eq!(&vm.memory().as_slice()[..4], &[0x82, 0x03, 0x2A, 0x00]);
}

mod cli {
  use super::*;

  fn ls8() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ls8"))
  }

  #[test]
  fn runs_program() {
    let output = ls8().arg(program_path("mult.ls8")).output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "72\n");
  }

  #[test]
  fn trace_goes_to_stderr() {
    let output = ls8()
      .arg("--trace")
      .arg(program_path("print8.ls8"))
      .output()
      .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "8\n");
    let stderr = String::from_utf8_lossy(&output.stderr);
    let first = stderr.lines().next().unwrap();
    assert_eq!(first, "00 | 82 00 08 | 00 00 00 00 00 00 00 F4");
    assert_eq!(stderr.lines().count(), 3);
  }

  #[test]
  fn missing_argument_is_usage_error() {
    let output = ls8().output().unwrap();
    assert_eq!(output.status.code(), Some(1));
  }

  #[test]
  fn missing_file_is_open_error() {
    let output = ls8().arg("does/not/exist.ls8").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("error opening file"));
  }

  #[test]
  fn step_limit_is_fault() {
    let path = std::env::temp_dir().join(format!("ls8-spin-{}.ls8", std::process::id()));
    std::fs::write(&path, "00000111\n").unwrap();
    let output = ls8()
      .args(["--max-steps", "50"])
      .arg(&path)
      .output()
      .unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(output.status.code(), Some(3));
  }

  #[test]
  fn strict_rejects_unknown_opcode() {
    let path = std::env::temp_dir().join(format!("ls8-strict-{}.ls8", std::process::id()));
    std::fs::write(&path, "00000111\n").unwrap();
    let output = ls8().arg("--strict").arg(&path).output().unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown opcode"));
  }
}
