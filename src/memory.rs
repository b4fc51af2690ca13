use crate::loader::LoadError;
use crate::region::Region;

/// Size of the LS-8 address space
pub const MEMORY_SIZE: usize = 256;

/// Flat 256-byte RAM. Addresses are bytes, so every address is valid and
/// arithmetic on them wraps.
#[derive(Clone, PartialEq, Eq)]
pub struct Memory {
  bytes: [u8; MEMORY_SIZE],
}

impl Memory {
  pub fn new() -> Self {
    Self {
      bytes: [0; MEMORY_SIZE],
    }
  }

  pub fn read(&self, address: u8) -> u8 {
    self.bytes[address as usize]
  }

  pub fn write(&mut self, address: u8, value: u8) {
    self.bytes[address as usize] = value;
  }

  /// Copy an image into RAM starting at address 0, leaving the rest as is
  pub fn load<R>(&mut self, region: &R) -> Result<(), LoadError>
  where
    R: Region + ?Sized,
  {
    let image = region.bytes();
    if image.len() > MEMORY_SIZE {
      return Err(LoadError::ImageTooLarge { len: image.len() });
    }
    self.bytes[..image.len()].copy_from_slice(image);
    Ok(())
  }

  pub fn as_slice(&self) -> &[u8] {
    &self.bytes
  }
}

impl Default for Memory {
  fn default() -> Self {
    Self::new()
  }
}

impl std::fmt::Debug for Memory {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    // 256 bytes is too noisy for `dbg!`, only show the used prefix
    let used = self
      .bytes
      .iter()
      .rposition(|&b| b != 0)
      .map_or(0, |i| i + 1);
    f.debug_struct("Memory")
      .field("used", &&self.bytes[..used])
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_is_zeroed() {
    let memory = Memory::new();
    assert!(memory.as_slice().iter().all(|&b| b == 0));
    assert_eq!(memory.as_slice().len(), MEMORY_SIZE);
  }

  #[test]
  fn read_write() {
    let mut memory = Memory::new();
    memory.write(0x00, 0x12);
    memory.write(0xFF, 0x34);
    assert_eq!(memory.read(0x00), 0x12);
    assert_eq!(memory.read(0xFF), 0x34);
    assert_eq!(memory.read(0x01), 0x00);
  }

  #[test]
  fn load_places_image_at_zero() {
    let mut memory = Memory::new();
    memory.write(0x10, 0xAA);
    memory.load(&[0x82u8, 0x00, 0x08]).unwrap();
    assert_eq!(&memory.as_slice()[..3], &[0x82, 0x00, 0x08]);
    assert_eq!(memory.read(0x10), 0xAA);
  }

  #[test]
  fn load_full_image() {
    let mut memory = Memory::new();
    let image = vec![0x01; MEMORY_SIZE];
    assert!(memory.load(image.as_slice()).is_ok());
    assert_eq!(memory.read(0xFF), 0x01);
  }

  #[test]
  fn load_rejects_oversized_image() {
    let mut memory = Memory::new();
    let image = vec![0x01; MEMORY_SIZE + 1];
    assert!(matches!(
      memory.load(image.as_slice()),
      Err(LoadError::ImageTooLarge { len: 257 })
    ));
    assert_eq!(memory.read(0x00), 0x00);
  }
}
