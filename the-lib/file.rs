//! Loading and saving documents as newline-delimited UTF-8 text.
//!
//! Saving never writes the destination in place: the lines go to a fresh
//! temporary file next to it, which is flushed, synced and then renamed over
//! the destination. If any step fails the destination is untouched and the
//! temporary file is kept on disk for manual cleanup; its path is part of
//! the error.

use std::{
  fs::{
    self,
    File,
  },
  io::{
    self,
    BufRead,
    BufReader,
    BufWriter,
    Write,
  },
  path::{
    Path,
    PathBuf,
  },
};

use tempfile::{
  Builder,
  NamedTempFile,
};
use thiserror::Error;

use crate::document::Document;

#[derive(Debug, Error)]
pub enum FileError {
  #[error("failed to read {path}: {source}")]
  Read {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("failed to create temporary file in {dir}: {source}")]
  CreateTemp {
    dir:    PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("failed to write temporary file {temp}: {source}")]
  Write {
    temp:   PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("failed to replace {path} with temporary file {temp}: {source}")]
  Replace {
    path:   PathBuf,
    temp:   PathBuf,
    #[source]
    source: io::Error,
  },
}

pub type Result<T> = std::result::Result<T, FileError>;

/// Read `path` into a new document.
///
/// A file that does not exist yields an empty document; it is created on the
/// first save. `\r\n` endings are read as plain line breaks.
pub fn load(path: &Path) -> Result<Document> {
  let read_err = |source| {
    FileError::Read {
      path: path.to_path_buf(),
      source,
    }
  };

  let file = match File::open(path) {
    Ok(file) => file,
    Err(err) if err.kind() == io::ErrorKind::NotFound => {
      tracing::debug!("{} does not exist, starting empty", path.display());
      return Ok(Document::new());
    },
    Err(err) => return Err(read_err(err)),
  };

  let lines = BufReader::new(file)
    .lines()
    .collect::<io::Result<Vec<String>>>()
    .map_err(read_err)?;
  tracing::debug!("loaded {} line(s) from {}", lines.len(), path.display());

  Ok(Document::from_lines(lines))
}

/// Write every line of `doc`, each followed by `\n`, to `path`.
pub fn save(path: &Path, doc: &Document) -> Result<()> {
  let dir = match path.parent() {
    Some(dir) if !dir.as_os_str().is_empty() => dir,
    _ => Path::new("."),
  };

  let mut temp = Builder::new()
    .prefix(".tmp")
    .tempfile_in(dir)
    .map_err(|source| {
      FileError::CreateTemp {
        dir: dir.to_path_buf(),
        source,
      }
    })?;
  tracing::debug!(
    "saving {} line(s) to {} via {}",
    doc.line_count(),
    path.display(),
    temp.path().display()
  );

  if let Err(source) = write_lines(&mut temp, doc, path) {
    let temp = keep(temp);
    tracing::warn!("writing {} failed: {source}", temp.display());
    return Err(FileError::Write { temp, source });
  }

  if let Err(err) = temp.persist(path) {
    let source = err.error;
    let temp = keep(err.file);
    tracing::warn!("replacing {} failed: {source}", path.display());
    return Err(FileError::Replace {
      path: path.to_path_buf(),
      temp,
      source,
    });
  }

  Ok(())
}

fn write_lines(temp: &mut NamedTempFile, doc: &Document, path: &Path) -> io::Result<()> {
  // Keep the permissions of the file being replaced.
  if let Ok(metadata) = fs::metadata(path) {
    temp.as_file().set_permissions(metadata.permissions())?;
  } else {
    set_new_file_permissions(temp.as_file())?;
  }

  let mut writer = BufWriter::new(temp.as_file_mut());
  let mut buf = String::new();
  for line in doc.lines() {
    buf.clear();
    buf.extend(line.iter());
    buf.push('\n');
    writer.write_all(buf.as_bytes())?;
  }
  writer.flush()?;
  drop(writer);

  temp.as_file().sync_all()
}

#[cfg(unix)]
fn set_new_file_permissions(file: &File) -> io::Result<()> {
  use std::os::unix::fs::PermissionsExt;

  file.set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_new_file_permissions(_file: &File) -> io::Result<()> {
  Ok(())
}

/// Detach the temporary file from its drop guard so it stays on disk.
fn keep(temp: NamedTempFile) -> PathBuf {
  let path = temp.path().to_path_buf();
  match temp.keep() {
    Ok((_, path)) => path,
    Err(err) => {
      tracing::warn!("could not keep temporary file {}: {}", path.display(), err.error);
      path
    },
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn missing_file_is_an_empty_document() {
    let dir = tempfile::tempdir().unwrap();
    let doc = load(&dir.path().join("nope.txt")).unwrap();
    assert_eq!(doc, Document::new());
  }

  #[test]
  fn load_splits_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, "one\r\ntwo\n\nfour").unwrap();

    let doc = load(&path).unwrap();
    assert_eq!(doc.to_strings(), vec!["one", "two", "", "four"]);
  }

  #[test]
  fn empty_file_is_one_empty_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.txt");
    fs::write(&path, "").unwrap();

    assert_eq!(load(&path).unwrap().to_strings(), vec![""]);
  }

  #[test]
  fn save_round_trips_and_leaves_no_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");
    let doc = Document::from_lines(["héllo", "", "wörld"]);

    save(&path, &doc).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "héllo\n\nwörld\n");
    assert_eq!(load(&path).unwrap().to_strings(), doc.to_strings());

    let entries = fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 1);
  }

  #[test]
  fn save_overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");
    fs::write(&path, "old contents\nmore\n").unwrap();

    save(&path, &Document::from_lines(["new"])).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
  }

  #[test]
  fn save_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.txt");

    let err = save(&path, &Document::new()).unwrap_err();
    assert!(matches!(err, FileError::CreateTemp { .. }));
    assert!(!path.exists());
  }

  #[test]
  fn failed_replace_keeps_destination_and_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    // A non-empty directory cannot be replaced by a file.
    let path = dir.path().join("taken");
    fs::create_dir(&path).unwrap();
    fs::write(path.join("inner"), "x").unwrap();

    let err = save(&path, &Document::from_lines(["data"])).unwrap_err();
    let FileError::Replace { temp, .. } = err else {
      panic!("expected a replace error, got {err:?}");
    };
    assert!(path.is_dir());
    assert_eq!(fs::read_to_string(temp).unwrap(), "data\n");
  }
}
