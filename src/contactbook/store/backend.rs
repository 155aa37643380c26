use crate::error::Result;
use crate::model::Record;
use uuid::Uuid;

/// Abstract interface for raw storage I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while RecordStore handles the "what" (keys, queries, consistency).
pub trait StorageBackend {
    // --- Record list ---

    /// Load every record, in stored order. A missing list is an empty list.
    fn load_records(&self) -> Result<Vec<Record>>;

    /// Replace the stored record list.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn save_records(&self, records: &[Record]) -> Result<()>;

    // --- Photo blobs ---

    /// Read the photo for a record.
    /// Returns Ok(None) if no blob exists; Err only on actual I/O errors.
    fn read_photo(&self, id: &Uuid) -> Result<Option<Vec<u8>>>;

    /// Write the photo for a record. MUST be atomic.
    fn write_photo(&self, id: &Uuid, bytes: &[u8]) -> Result<()>;

    /// Delete the photo for a record. Deleting a missing blob is not an error.
    fn delete_photo(&self, id: &Uuid) -> Result<()>;

    /// List the record ids that have a photo blob (for reconciliation).
    fn list_photo_ids(&self) -> Result<Vec<Uuid>>;
}
