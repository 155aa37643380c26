use super::backend::StorageBackend;
use crate::error::{ContactsError, Result};
use crate::model::Record;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const RECORDS_FILENAME: &str = "contacts.json";
const PHOTOS_DIRNAME: &str = "photos";
const PHOTO_EXT: &str = "photo";

/// File-based storage rooted at a single data directory.
///
/// ```text
/// <root>/
/// ├── contacts.json        # record list (JSON array)
/// └── photos/<uuid>.photo  # one blob per record with a photo
/// ```
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn records_path(&self) -> PathBuf {
        self.root.join(RECORDS_FILENAME)
    }

    fn photos_dir(&self) -> PathBuf {
        self.root.join(PHOTOS_DIRNAME)
    }

    fn photo_path(&self, id: &Uuid) -> PathBuf {
        self.photos_dir().join(format!("{}.{}", id, PHOTO_EXT))
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(ContactsError::Io)?;
        }
        Ok(())
    }

    /// Write `bytes` next to `target` and rename over it.
    fn write_atomic(&self, dir: &Path, target: &Path, bytes: &[u8]) -> Result<()> {
        self.ensure_dir(dir)?;
        let tmp_path = dir.join(format!(".write-{}.tmp", Uuid::new_v4()));
        let result = fs::write(&tmp_path, bytes).and_then(|_| fs::rename(&tmp_path, target));
        if let Err(e) = result {
            let _ = fs::remove_file(&tmp_path);
            return Err(ContactsError::Io(e));
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn load_records(&self) -> Result<Vec<Record>> {
        let path = self.records_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path).map_err(ContactsError::Io)?;
        let records: Vec<Record> =
            serde_json::from_str(&content).map_err(ContactsError::Serialization)?;
        Ok(records)
    }

    fn save_records(&self, records: &[Record]) -> Result<()> {
        let content = serde_json::to_string_pretty(records).map_err(ContactsError::Serialization)?;
        self.write_atomic(&self.root, &self.records_path(), content.as_bytes())
    }

    fn read_photo(&self, id: &Uuid) -> Result<Option<Vec<u8>>> {
        let path = self.photo_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(path).map_err(ContactsError::Io)?;
        Ok(Some(bytes))
    }

    fn write_photo(&self, id: &Uuid, bytes: &[u8]) -> Result<()> {
        self.write_atomic(&self.photos_dir(), &self.photo_path(id), bytes)
    }

    fn delete_photo(&self, id: &Uuid) -> Result<()> {
        let path = self.photo_path(id);
        if path.exists() {
            fs::remove_file(path).map_err(ContactsError::Io)?;
        }
        Ok(())
    }

    fn list_photo_ids(&self) -> Result<Vec<Uuid>> {
        let dir = self.photos_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(&dir).map_err(ContactsError::Io)? {
            let path = entry.map_err(ContactsError::Io)?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(PHOTO_EXT) {
                continue;
            }
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
            if let Ok(id) = Uuid::parse_str(stem) {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}
