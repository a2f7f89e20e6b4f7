//! JsonFileSeenStore - SeenSet を JSON ファイル 1 個に保存する
//!
//! 書き込みは atomic-write-file で一時ファイル → rename。途中でプロセスが
//! 落ちても前回の内容が残る。

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use atomic_write_file::AtomicWriteFile;

use crate::domain::{SeenRecord, StoreError};
use crate::ports::SeenStore;

#[derive(Debug, Clone)]
pub struct JsonFileSeenStore {
    path: PathBuf,
}

impl JsonFileSeenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SeenStore for JsonFileSeenStore {
    fn load(&self) -> Result<Option<SeenRecord>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, record: &SeenRecord) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let json =
            serde_json::to_vec_pretty(record).map_err(|e| StoreError::Other(e.to_string()))?;

        let mut file = AtomicWriteFile::options().open(&self.path)?;
        file.write_all(&json)?;
        file.write_all(b"\n")?;
        file.commit()?;
        Ok(())
    }
}
