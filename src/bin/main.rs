use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use emulator::loader::{self, LoadError};
use emulator::region::Program;
use emulator::vm::{Config, UnknownOpcode, Vm};

const EXIT_USAGE: u8 = 1;
const EXIT_OPEN: u8 = 2;
const EXIT_FAULT: u8 = 3;

/// LS-8 emulator
#[derive(Parser, Debug)]
#[command(name = "ls8")]
struct Args {
  /// Program to run, one binary byte per line
  program: PathBuf,

  /// Print machine state to stderr before every instruction
  #[arg(long)]
  trace: bool,

  /// Stop with an error after this many instructions
  #[arg(long)]
  max_steps: Option<u64>,

  /// Treat unknown opcodes as a fatal error instead of stalling on them
  #[arg(long)]
  strict: bool,
}

fn main() -> ExitCode {
  let args = match Args::try_parse() {
    Ok(args) => args,
    Err(e) if !e.use_stderr() => {
      // --help and --version
      let _ = e.print();
      return ExitCode::SUCCESS;
    }
    Err(e) => {
      let _ = e.print();
      return ExitCode::from(EXIT_USAGE);
    }
  };

  let program = match loader::load_file(&args.program) {
    Ok(program) => program,
    Err(e @ LoadError::Open { .. }) => {
      eprintln!("{e}");
      return ExitCode::from(EXIT_OPEN);
    }
    Err(e) => {
      eprintln!("{:?}", anyhow::Error::new(e));
      return ExitCode::from(EXIT_FAULT);
    }
  };

  match run(&args, &program) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      eprintln!("{e:?}");
      ExitCode::from(EXIT_FAULT)
    }
  }
}

fn run(args: &Args, program: &Program) -> anyhow::Result<()> {
  let config = Config {
    unknown_opcode: if args.strict {
      UnknownOpcode::Fault
    } else {
      UnknownOpcode::Stall
    },
    max_steps: args.max_steps,
    trace: args.trace,
  };
  let mut vm = Vm::with_config(config);
  vm.load(program)
    .with_context(|| format!("loading {}", args.program.display()))?;

  let stdout = io::stdout();
  let mut out = stdout.lock();
  vm.run(&mut out)
    .with_context(|| format!("running {}", args.program.display()))?;
  out.flush()?;
  Ok(())
}
