use super::backend::StorageBackend;
use crate::error::{ContactsError, Result};
use crate::model::Record;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// In-memory storage backend for testing.
///
/// Cloning yields another handle to the same storage, so a test can keep a
/// clone after the store has been moved onto its worker thread and still
/// inspect state or inject failures.
#[derive(Clone, Default)]
pub struct MemBackend {
    records: Arc<RwLock<Vec<Record>>>,
    photos: Arc<RwLock<HashMap<Uuid, Vec<u8>>>>,
    simulate_write_error: Arc<AtomicBool>,
    fail_save_records: Arc<AtomicBool>,
    fail_write_photo: Arc<AtomicBool>,
    fail_delete_photo: Arc<AtomicBool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::SeqCst);
    }

    /// Make only `save_records` fail.
    pub fn set_fail_save_records(&self, fail: bool) {
        self.fail_save_records.store(fail, Ordering::SeqCst);
    }

    /// Make only `write_photo` fail.
    pub fn set_fail_write_photo(&self, fail: bool) {
        self.fail_write_photo.store(fail, Ordering::SeqCst);
    }

    /// Make only `delete_photo` fail.
    pub fn set_fail_delete_photo(&self, fail: bool) {
        self.fail_delete_photo.store(fail, Ordering::SeqCst);
    }

    /// Number of photo blobs currently held.
    pub fn photo_count(&self) -> usize {
        self.photos.read().map(|p| p.len()).unwrap_or(0)
    }

    fn check_writable(&self, op: &AtomicBool, name: &str) -> Result<()> {
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(ContactsError::Store("Simulated write error".to_string()));
        }
        if op.load(Ordering::SeqCst) {
            return Err(ContactsError::Store(format!("Simulated {} error", name)));
        }
        Ok(())
    }
}

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| ContactsError::Store("in-memory storage lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| ContactsError::Store("in-memory storage lock poisoned".to_string()))
}

impl StorageBackend for MemBackend {
    fn load_records(&self) -> Result<Vec<Record>> {
        Ok(read(&self.records)?.clone())
    }

    fn save_records(&self, records: &[Record]) -> Result<()> {
        self.check_writable(&self.fail_save_records, "save_records")?;
        *write(&self.records)? = records.to_vec();
        Ok(())
    }

    fn read_photo(&self, id: &Uuid) -> Result<Option<Vec<u8>>> {
        Ok(read(&self.photos)?.get(id).cloned())
    }

    fn write_photo(&self, id: &Uuid, bytes: &[u8]) -> Result<()> {
        self.check_writable(&self.fail_write_photo, "write_photo")?;
        write(&self.photos)?.insert(*id, bytes.to_vec());
        Ok(())
    }

    fn delete_photo(&self, id: &Uuid) -> Result<()> {
        self.check_writable(&self.fail_delete_photo, "delete_photo")?;
        write(&self.photos)?.remove(id);
        Ok(())
    }

    fn list_photo_ids(&self) -> Result<Vec<Uuid>> {
        Ok(read(&self.photos)?.keys().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Contact;

    #[test]
    fn clones_share_storage() {
        let backend = MemBackend::new();
        let other = backend.clone();

        let record = Record::new(&Contact::new("a@b.com"));
        backend.save_records(std::slice::from_ref(&record)).unwrap();
        other.write_photo(&record.id, b"png").unwrap();

        assert_eq!(other.load_records().unwrap(), vec![record.clone()]);
        assert_eq!(
            backend.read_photo(&record.id).unwrap(),
            Some(b"png".to_vec())
        );
        assert_eq!(backend.photo_count(), 1);
    }

    #[test]
    fn simulated_write_error_blocks_writes_only() {
        let backend = MemBackend::new();
        let record = Record::new(&Contact::new("a@b.com"));
        backend.save_records(std::slice::from_ref(&record)).unwrap();

        backend.set_simulate_write_error(true);
        assert!(backend.save_records(&[]).is_err());
        assert!(backend.write_photo(&record.id, b"x").is_err());
        assert_eq!(backend.load_records().unwrap().len(), 1);

        backend.set_simulate_write_error(false);
        backend.save_records(&[]).unwrap();
        assert!(backend.load_records().unwrap().is_empty());
    }

    #[test]
    fn single_operation_failures() {
        let backend = MemBackend::new();
        let id = Uuid::new_v4();

        backend.set_fail_save_records(true);
        assert!(backend.save_records(&[]).is_err());
        backend.write_photo(&id, b"x").unwrap();

        backend.set_fail_delete_photo(true);
        assert!(backend.delete_photo(&id).is_err());
        assert_eq!(backend.photo_count(), 1);

        backend.set_fail_write_photo(true);
        let err = backend.write_photo(&id, b"y").unwrap_err();
        assert_eq!(err.to_string(), "Store error: Simulated write_photo error");
        assert_eq!(backend.read_photo(&id).unwrap(), Some(b"x".to_vec()));
    }
}
