//! Zip archive handling for UDF packages.
//!
//! Archives are flat: one entry per function, named by the caller.
//! The underlying writer finalizes the central directory when dropped, so
//! a builder abandoned by an early `?` still releases its file handle.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::Result;

/// Writes a zip archive entry by entry.
pub struct ZipBuilder {
    writer: ZipWriter<File>,
    path: PathBuf,
}

impl ZipBuilder {
    /// Create (or truncate) an archive at `path`, creating parent directories.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;

        Ok(Self {
            writer: ZipWriter::new(file),
            path: path.to_path_buf(),
        })
    }

    /// Add one entry, copying its content from `reader`.
    pub fn add(&mut self, name: &str, reader: &mut impl Read) -> Result<()> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.writer.start_file(name, options)?;
        std::io::copy(reader, &mut self.writer)?;
        Ok(())
    }

    /// Add a batch of entries in order.
    ///
    /// When several entries share a name only the last one is written; the
    /// earlier ones are skipped with a warning. Returns the number of
    /// entries written.
    pub fn add_all<R: Read>(&mut self, entries: Vec<(String, R)>) -> Result<usize> {
        let names: Vec<String> = entries.iter().map(|(name, _)| name.clone()).collect();
        let mut written = 0;

        for (index, (name, mut reader)) in entries.into_iter().enumerate() {
            if names[index + 1..].contains(&name) {
                tracing::warn!(
                    "Archive entry '{}' in {} is overwritten by a later function",
                    name,
                    self.path.display()
                );
                continue;
            }
            self.add(&name, &mut reader)?;
            written += 1;
        }

        Ok(written)
    }

    /// Write the central directory and close the file.
    pub fn finish(self) -> Result<PathBuf> {
        self.writer.finish()?;
        Ok(self.path)
    }
}

/// Archive a single file under `entry_name`.
pub fn zip_single_file(source: &Path, entry_name: &str, archive_path: &Path) -> Result<()> {
    let mut file = File::open(source)?;
    let mut builder = ZipBuilder::create(archive_path)?;
    builder.add(entry_name, &mut file)?;
    builder.finish()?;
    Ok(())
}

/// Names of all entries in an archive, in archive order.
pub fn entry_names(archive_path: &Path) -> Result<Vec<String>> {
    let mut archive = ZipArchive::new(File::open(archive_path)?)?;
    let mut names = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        names.push(archive.by_index(index)?.name().to_string());
    }
    Ok(names)
}

/// Read one entry of an archive as UTF-8 text.
pub fn read_entry(archive_path: &Path, entry_name: &str) -> Result<String> {
    let mut archive = ZipArchive::new(File::open(archive_path)?)?;
    let mut entry = archive.by_name(entry_name)?;

    let mut contents = String::new();
    entry.read_to_string(&mut contents)?;
    Ok(contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::TempDir;

    #[test]
    fn test_zip_single_file() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let source = temp.path().join("a-b-Foo.py");
        fs::write(&source, "def foo(): pass").unwrap();
        let archive = temp.path().join("out").join("a-b-Foo.zip");

        zip_single_file(&source, "a.py", &archive).expect("Failed to zip");

        assert_eq!(entry_names(&archive).unwrap(), vec!["a.py"]);
        assert_eq!(read_entry(&archive, "a.py").unwrap(), "def foo(): pass");
    }

    #[test]
    fn test_add_all_keeps_order() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let archive = temp.path().join("batch.zip");

        let mut builder = ZipBuilder::create(&archive).unwrap();
        let written = builder
            .add_all(vec![
                ("first.py".to_string(), "1".as_bytes()),
                ("second.py".to_string(), "2".as_bytes()),
            ])
            .unwrap();
        builder.finish().unwrap();

        assert_eq!(written, 2);
        assert_eq!(entry_names(&archive).unwrap(), vec!["first.py", "second.py"]);
    }

    #[test]
    fn test_add_all_last_duplicate_wins() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let archive = temp.path().join("dupes.zip");

        let mut builder = ZipBuilder::create(&archive).unwrap();
        let written = builder
            .add_all(vec![
                ("x.py".to_string(), "old".as_bytes()),
                ("y.py".to_string(), "y".as_bytes()),
                ("x.py".to_string(), "new".as_bytes()),
            ])
            .unwrap();
        builder.finish().unwrap();

        assert_eq!(written, 2);
        assert_eq!(entry_names(&archive).unwrap(), vec!["y.py", "x.py"]);
        assert_eq!(read_entry(&archive, "x.py").unwrap(), "new");
    }

    #[test]
    fn test_dropped_builder_leaves_readable_archive() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let archive = temp.path().join("dropped.zip");

        {
            let mut builder = ZipBuilder::create(&archive).unwrap();
            builder.add("m.py", &mut "x = 1".as_bytes()).unwrap();
        }

        assert_eq!(read_entry(&archive, "m.py").unwrap(), "x = 1");
    }

    #[test]
    fn test_read_missing_entry() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let archive = temp.path().join("one.zip");
        let mut builder = ZipBuilder::create(&archive).unwrap();
        builder.add("a.py", &mut "".as_bytes()).unwrap();
        builder.finish().unwrap();

        let err = read_entry(&archive, "b.py").unwrap_err();
        assert!(matches!(err, Error::Archive(_)));
    }
}
