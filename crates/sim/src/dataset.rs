//! On-disk label files: `ds{i}.txt`, one `g`/`b` per line, 1-based `i`.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chip_sampling_shared::label::{Batch, ChipLabel};

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("dataset I/O failed for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}:{line}: invalid chip label {found:?}, expected 'g' or 'b'", .path.display())]
    InvalidLabel {
        path: PathBuf,
        line: usize,
        found: String,
    },
    #[error("{}: expected {expected} labels, found {found}", .path.display())]
    LengthMismatch {
        path: PathBuf,
        expected: usize,
        found: usize,
    },
}

pub struct DatasetStore {
    dir: PathBuf,
}

impl DatasetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn batch_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("ds{}.txt", index))
    }

    fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> DatasetError + '_ {
        move |source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn ensure_dir(&self) -> Result<(), DatasetError> {
        fs::create_dir_all(&self.dir).map_err(Self::io_error(&self.dir))
    }

    pub fn write_batch(&self, index: usize, batch: &Batch) -> Result<(), DatasetError> {
        let path = self.batch_path(index);
        let file = File::create(&path).map_err(Self::io_error(&path))?;
        let mut out = BufWriter::new(file);
        for label in batch.labels() {
            writeln!(out, "{}", label.as_char()).map_err(Self::io_error(&path))?;
        }
        out.flush().map_err(Self::io_error(&path))
    }

    pub fn read_batch(&self, index: usize, batch_size: usize) -> Result<Batch, DatasetError> {
        let path = self.batch_path(index);
        let text = fs::read_to_string(&path).map_err(Self::io_error(&path))?;

        // trailing blank lines are tolerated, interior ones are not
        let body = text.trim_end_matches(|c: char| c == '\n' || c == '\r');
        let mut labels = Vec::with_capacity(batch_size);
        for (i, line) in body.lines().enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let mut chars = line.chars();
            let label = match (chars.next(), chars.next()) {
                (Some(c), None) => ChipLabel::from_char(c),
                _ => None,
            };
            match label {
                Some(label) => labels.push(label),
                None => {
                    return Err(DatasetError::InvalidLabel {
                        path,
                        line: i + 1,
                        found: line.to_string(),
                    })
                }
            }
        }

        if labels.len() != batch_size {
            return Err(DatasetError::LengthMismatch {
                path,
                expected: batch_size,
                found: labels.len(),
            });
        }
        Ok(Batch::new(labels))
    }

    pub fn write_all(&self, batches: &[Batch]) -> Result<(), DatasetError> {
        self.ensure_dir()?;
        for (i, batch) in batches.iter().enumerate() {
            self.write_batch(i + 1, batch)?;
        }
        tracing::debug!(dir = %self.dir.display(), files = batches.len(), "wrote datasets");
        Ok(())
    }

    pub fn read_all(&self, batch_count: usize, batch_size: usize) -> Result<Vec<Batch>, DatasetError> {
        (1..=batch_count)
            .map(|i| self.read_batch(i, batch_size))
            .collect()
    }

    /// Writes every batch then reads the whole set back from disk.
    pub fn persist_and_reload(&self, batches: &[Batch]) -> Result<Vec<Batch>, DatasetError> {
        self.write_all(batches)?;
        let batch_size = batches.first().map_or(0, Batch::len);
        self.read_all(batches.len(), batch_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_batch() -> Batch {
        Batch::new(vec![
            ChipLabel::Good,
            ChipLabel::Bad,
            ChipLabel::Good,
            ChipLabel::Bad,
        ])
    }

    #[test]
    fn test_file_format() {
        let dir = tempfile::tempdir().unwrap();
        let store = DatasetStore::new(dir.path());
        store.write_batch(1, &sample_batch()).unwrap();
        let text = fs::read_to_string(dir.path().join("ds1.txt")).unwrap();
        assert_eq!(text, "g\nb\ng\nb\n");
    }

    #[test]
    fn test_persist_and_reload_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = DatasetStore::new(dir.path().join("output_files"));
        let batches = vec![sample_batch(), Batch::all_good(4)];
        let reloaded = store.persist_and_reload(&batches).unwrap();
        assert_eq!(reloaded, batches);
        assert!(store.batch_path(2).exists());
    }

    #[test]
    fn test_unexpected_character_is_integrity_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ds1.txt"), "g\nb\nx\ng\n").unwrap();
        let store = DatasetStore::new(dir.path());
        match store.read_batch(1, 4) {
            Err(DatasetError::InvalidLabel { line, found, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(found, "x");
            }
            other => panic!("expected InvalidLabel, got {:?}", other),
        }
    }

    #[test]
    fn test_multi_char_line_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ds1.txt"), "gb\n").unwrap();
        let store = DatasetStore::new(dir.path());
        assert!(matches!(
            store.read_batch(1, 1),
            Err(DatasetError::InvalidLabel { line: 1, .. })
        ));
    }

    #[test]
    fn test_crlf_accepted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ds1.txt"), "g\r\nb\r\n").unwrap();
        let store = DatasetStore::new(dir.path());
        let batch = store.read_batch(1, 2).unwrap();
        assert_eq!(batch.defect_count(), 1);
    }

    #[test]
    fn test_trailing_blank_lines_accepted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ds1.txt"), "g\nb\n\n").unwrap();
        fs::write(dir.path().join("ds2.txt"), "g\r\nb\r\n\r\n\n").unwrap();
        fs::write(dir.path().join("ds3.txt"), "g\nb").unwrap();
        let store = DatasetStore::new(dir.path());
        for index in 1..=3 {
            let batch = store.read_batch(index, 2).unwrap();
            assert_eq!(batch.labels(), &[ChipLabel::Good, ChipLabel::Bad]);
        }
    }

    #[test]
    fn test_interior_blank_line_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ds1.txt"), "g\n\nb\n").unwrap();
        let store = DatasetStore::new(dir.path());
        match store.read_batch(1, 2) {
            Err(DatasetError::InvalidLabel { line, found, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(found, "");
            }
            other => panic!("expected InvalidLabel, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_file_is_empty_batch() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ds1.txt"), "").unwrap();
        let store = DatasetStore::new(dir.path());
        assert!(store.read_batch(1, 0).unwrap().is_empty());
    }

    #[test]
    fn test_short_file_is_length_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ds1.txt"), "g\ng\n").unwrap();
        let store = DatasetStore::new(dir.path());
        assert!(matches!(
            store.read_batch(1, 3),
            Err(DatasetError::LengthMismatch {
                expected: 3,
                found: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = DatasetStore::new(dir.path());
        assert!(matches!(store.read_batch(7, 1), Err(DatasetError::Io { .. })));
    }
}
