//! CSV artifact writer.
//!
//! Jobs drop per-run CSV files under the configured output directory; the
//! same rows also go to the spreadsheet, so these files are the local audit
//! trail.

use std::path::{Path, PathBuf};

use mercato_core::MercatoError;

/// Writes CSV artifacts under a fixed output directory.
pub struct CsvWriter {
    dir: PathBuf,
}

impl CsvWriter {
    /// Create the writer, creating the output directory if needed.
    ///
    /// # Errors
    /// Returns [`MercatoError::Storage`] when the directory cannot be
    /// created.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, MercatoError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)
            .map_err(|e| MercatoError::storage(format!("create {}: {e}", dir.display())))?;
        Ok(Self { dir })
    }

    /// Write `header` + `rows` to `<dir>/<filename>`, returning the path.
    ///
    /// # Errors
    /// Returns [`MercatoError::Storage`] on I/O failure.
    pub fn write(
        &self,
        filename: &str,
        header: &[&str],
        rows: &[Vec<String>],
    ) -> Result<PathBuf, MercatoError> {
        let path = self.dir.join(filename);
        let mut w = csv::Writer::from_path(&path)
            .map_err(|e| MercatoError::storage(format!("open {}: {e}", path.display())))?;
        w.write_record(header)
            .map_err(|e| MercatoError::storage(e.to_string()))?;
        for row in rows {
            w.write_record(row)
                .map_err(|e| MercatoError::storage(e.to_string()))?;
        }
        w.flush()
            .map_err(|e| MercatoError::storage(e.to_string()))?;
        Ok(path)
    }
}
