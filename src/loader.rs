//! Reads `.ls8` program text.
//!
//! Each line that starts (after optional whitespace) with a run of `0`/`1`
//! characters contributes one byte; anything after the run is ignored, and
//! lines without such a run (blank lines, comments) are skipped.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::region::Program;

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
  #[error("error opening file {}", path.display())]
  Open {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to read program text")]
  Read(#[from] io::Error),

  #[error("program is {len} bytes, larger than memory")]
  ImageTooLarge { len: usize },
}

/// Parse the leading binary literal of a line, truncated to a byte
pub fn parse_line(line: &str) -> Option<u8> {
  let digits = line.trim_start();
  let run = digits
    .bytes()
    .take_while(|b| matches!(b, b'0' | b'1'))
    .collect::<Vec<_>>();
  if run.is_empty() {
    return None;
  }
  // only the low eight bits survive, like storing into a byte
  Some(
    run
      .into_iter()
      .fold(0u8, |acc, bit| (acc << 1) | (bit - b'0')),
  )
}

/// Parse a whole program from a reader
pub fn parse<R>(reader: R) -> Result<Program, LoadError>
where
  R: BufRead,
{
  let mut bytes = Vec::new();
  for line in reader.lines() {
    if let Some(byte) = parse_line(&line?) {
      bytes.push(byte);
    }
  }
  Ok(bytes.into())
}

/// Open and parse a program file
pub fn load_file(path: impl AsRef<Path>) -> Result<Program, LoadError> {
  let path = path.as_ref();
  let file = File::open(path).map_err(|source| LoadError::Open {
    path: path.to_path_buf(),
    source,
  })?;
  parse(BufReader::new(file))
}

#[cfg(test)]
mod tests {
  use super::*;

  use crate::region::Region;

  #[test]
  fn parse_line_variants() {
    assert_eq!(parse_line("10000010"), Some(0x82));
    assert_eq!(parse_line("00000000 # R0"), Some(0x00));
    assert_eq!(parse_line("  \t01000111\n"), Some(0x47));
    assert_eq!(parse_line("1"), Some(1));
    assert_eq!(parse_line("101 junk 11"), Some(0b101));
    assert_eq!(parse_line(""), None);
    assert_eq!(parse_line("# comment"), None);
    assert_eq!(parse_line("2"), None);
  }

  #[test]
  fn parse_line_keeps_low_byte() {
    assert_eq!(parse_line("111111111"), Some(0xFF));
    assert_eq!(parse_line("100000001"), Some(0x01));
  }

  #[test]
  fn parse_skips_non_binary_lines() {
    let text = "\
# print8.ls8: Print the number 8 on the screen

10000010 # LDI R0,8
00000000
00001000
01000111 # PRN R0

00000000
00000001 # HLT
";
    let program = parse(text.as_bytes()).unwrap();
    assert_eq!(program.bytes(), &[0x82, 0x00, 0x08, 0x47, 0x00, 0x01]);
  }

  #[test]
  fn parse_empty() {
    let program = parse("\n# nothing here\n".as_bytes()).unwrap();
    assert!(program.is_empty());
  }

  #[test]
  fn load_missing_file() {
    let path = std::env::temp_dir().join("ls8-definitely-missing.ls8");
    match load_file(&path) {
      Err(LoadError::Open { path: p, .. }) => assert_eq!(p, path),
      other => panic!("expected open error, got {other:?}"),
    }
  }

  #[test]
  fn load_real_file() {
    let path = std::env::temp_dir().join(format!("ls8-loader-{}.ls8", std::process::id()));
    std::fs::write(&path, "00000001 # HLT\n").unwrap();
    let program = load_file(&path);
    std::fs::remove_file(&path).unwrap();
    assert_eq!(program.unwrap().bytes(), &[0x01]);
  }
}
