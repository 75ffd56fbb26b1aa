use std::{
  cell::RefCell,
  collections::BTreeMap,
  fs::{self, File},
  io::{self, BufWriter, Write},
  path::{Path, PathBuf},
  rc::Rc,
};

use crate::{error::PercolationResult, make_corrupt_error};

/// Destination for the named artifacts of a run.
pub trait OutputSink {
  type Writer: Write;

  /// Creates (or truncates) the artifact called `name`.
  fn create(&mut self, name: &str) -> PercolationResult<Self::Writer>;
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
  type Writer = S::Writer;

  fn create(&mut self, name: &str) -> PercolationResult<Self::Writer> {
    (**self).create(name)
  }
}

/// Writes artifacts as files in a directory, creating the directory on
/// first use. Existing files are overwritten; a failed run can leave
/// truncated files behind.
pub struct DirSink {
  dir: PathBuf,
}

impl DirSink {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }
}

impl OutputSink for DirSink {
  type Writer = BufWriter<File>;

  fn create(&mut self, name: &str) -> PercolationResult<Self::Writer> {
    fs::create_dir_all(&self.dir)?;
    let path = self.dir.join(name);
    tracing::debug!("writing {}", path.display());
    Ok(BufWriter::new(File::create(path)?))
  }
}

/// Keeps artifacts in memory.
#[derive(Default)]
pub struct MemorySink {
  files: BTreeMap<String, Rc<RefCell<Vec<u8>>>>,
}

impl MemorySink {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.files.keys().map(String::as_str)
  }

  pub fn get(&self, name: &str) -> Option<Vec<u8>> {
    self.files.get(name).map(|file| file.borrow().clone())
  }

  pub fn read(&self, name: &str) -> PercolationResult<Vec<u8>> {
    self
      .get(name)
      .ok_or_else(|| make_corrupt_error!("missing artifact {}", name))
  }
}

pub struct MemoryWriter {
  buffer: Rc<RefCell<Vec<u8>>>,
}

impl Write for MemoryWriter {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    self.buffer.borrow_mut().extend_from_slice(buf);
    Ok(buf.len())
  }

  fn flush(&mut self) -> io::Result<()> {
    Ok(())
  }
}

impl OutputSink for MemorySink {
  type Writer = MemoryWriter;

  fn create(&mut self, name: &str) -> PercolationResult<Self::Writer> {
    let buffer = Rc::new(RefCell::new(Vec::new()));
    self.files.insert(name.to_owned(), buffer.clone());
    Ok(MemoryWriter { buffer })
  }
}
