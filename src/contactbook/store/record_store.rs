use super::backend::StorageBackend;
use super::mem_backend::MemBackend;
use crate::error::{ContactsError, Result};
use crate::model::{Contact, Record};
use std::collections::HashSet;
use tracing::{debug, warn};
use uuid::Uuid;

/// Outcome of [`RecordStore::upsert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upserted {
    Created(Contact),
    Updated(Contact),
}

impl Upserted {
    pub fn contact(&self) -> &Contact {
        match self {
            Upserted::Created(c) | Upserted::Updated(c) => c,
        }
    }
}

/// Report from the `doctor` operation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DoctorReport {
    pub removed_orphan_photos: usize,
    pub cleared_missing_photos: usize,
}

pub struct RecordStore<B: StorageBackend> {
    pub(crate) backend: B,
}

impl RecordStore<MemBackend> {
    pub fn in_memory() -> Self {
        Self {
            backend: MemBackend::new(),
        }
    }
}

impl<B: StorageBackend> RecordStore<B> {
    /// Open a store over `backend`.
    ///
    /// The record list is read once up front: a list that cannot be read or
    /// parsed fails here rather than on the first operation.
    pub fn open(backend: B) -> Result<Self> {
        let records = backend.load_records()?;
        debug!(records = records.len(), "opened contact store");
        Ok(Self { backend })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn fetch_all(&self) -> Result<Vec<Contact>> {
        self.backend
            .load_records()?
            .into_iter()
            .map(|r| self.hydrate(r))
            .collect()
    }

    pub fn fetch_one(&self, email: &str) -> Result<Option<Contact>> {
        let found = self
            .backend
            .load_records()?
            .into_iter()
            .find(|r| r.matches_email(email));
        found.map(|r| self.hydrate(r)).transpose()
    }

    /// Case-insensitive substring search on full name OR job position.
    ///
    /// Filters are trimmed and blank ones count as absent. With neither
    /// filter present the result is empty rather than every record.
    pub fn search(&self, name: Option<&str>, position: Option<&str>) -> Result<Vec<Contact>> {
        let name = needle(name);
        let position = needle(position);
        if name.is_none() && position.is_none() {
            return Ok(Vec::new());
        }

        self.backend
            .load_records()?
            .into_iter()
            .filter(|r| {
                field_contains(r.full_name.as_deref(), name.as_deref())
                    || field_contains(r.job_position.as_deref(), position.as_deref())
            })
            .map(|r| self.hydrate(r))
            .collect()
    }

    pub fn exists(&self, email: &str) -> Result<bool> {
        Ok(self
            .backend
            .load_records()?
            .iter()
            .any(|r| r.matches_email(email)))
    }

    /// Insert a new record, failing with `DuplicateEmail` if the email is taken.
    pub fn create(&mut self, contact: &Contact) -> Result<Contact> {
        let records = self.backend.load_records()?;
        if records.iter().any(|r| r.matches_email(&contact.email)) {
            return Err(ContactsError::DuplicateEmail(contact.email.clone()));
        }
        self.insert(records, contact)
    }

    /// Overwrite name, position and photo of the record with the same email.
    /// The stored email itself never changes.
    pub fn update(&mut self, contact: &Contact) -> Result<Contact> {
        let records = self.backend.load_records()?;
        let position = records
            .iter()
            .position(|r| r.matches_email(&contact.email))
            .ok_or_else(|| ContactsError::NotFound(contact.email.clone()))?;
        self.replace(records, position, contact)
    }

    /// Update when the email is stored, create otherwise.
    pub fn upsert(&mut self, contact: &Contact) -> Result<Upserted> {
        let records = self.backend.load_records()?;
        match records.iter().position(|r| r.matches_email(&contact.email)) {
            Some(position) => self
                .replace(records, position, contact)
                .map(Upserted::Updated),
            None => self.insert(records, contact).map(Upserted::Created),
        }
    }

    /// Remove the record with this email and return what it held.
    pub fn delete_one(&mut self, email: &str) -> Result<Contact> {
        let mut records = self.backend.load_records()?;
        let position = records
            .iter()
            .position(|r| r.matches_email(email))
            .ok_or_else(|| ContactsError::NotFound(email.to_string()))?;

        let record = records.remove(position);
        let photo = if record.has_photo {
            self.backend.read_photo(&record.id)?
        } else {
            None
        };

        // Index first: a failed blob delete leaves an orphan for doctor.
        self.backend.save_records(&records)?;
        if record.has_photo {
            self.discard_photo(&record.id);
        }

        debug!(email = %record.email, "deleted contact");
        Ok(record.into_contact(photo))
    }

    /// Remove every record; returns how many there were.
    pub fn delete_all(&mut self) -> Result<usize> {
        let records = self.backend.load_records()?;
        self.backend.save_records(&[])?;
        for record in records.iter().filter(|r| r.has_photo) {
            self.discard_photo(&record.id);
        }
        debug!(count = records.len(), "deleted all contacts");
        Ok(records.len())
    }

    /// Reconcile the record list with the stored photo blobs.
    pub fn doctor(&mut self) -> Result<DoctorReport> {
        let mut records = self.backend.load_records()?;
        let blob_ids: HashSet<Uuid> = self.backend.list_photo_ids()?.into_iter().collect();
        let wanted: HashSet<Uuid> = records
            .iter()
            .filter(|r| r.has_photo)
            .map(|r| r.id)
            .collect();
        let mut report = DoctorReport::default();

        for id in blob_ids.difference(&wanted) {
            self.backend.delete_photo(id)?;
            report.removed_orphan_photos += 1;
        }

        for record in records.iter_mut() {
            if record.has_photo && !blob_ids.contains(&record.id) {
                warn!(email = %record.email, "photo blob missing, clearing reference");
                record.has_photo = false;
                report.cleared_missing_photos += 1;
            }
        }

        if report.cleared_missing_photos > 0 {
            self.backend.save_records(&records)?;
        }

        Ok(report)
    }

    fn hydrate(&self, record: Record) -> Result<Contact> {
        let photo = if record.has_photo {
            self.backend.read_photo(&record.id)?
        } else {
            None
        };
        Ok(record.into_contact(photo))
    }

    fn insert(&mut self, mut records: Vec<Record>, contact: &Contact) -> Result<Contact> {
        let record = Record::new(contact);

        // Blob first so a stored record never points at a missing photo.
        if let Some(photo) = &contact.photo {
            self.backend.write_photo(&record.id, photo)?;
        }
        records.push(record.clone());
        if let Err(e) = self.backend.save_records(&records) {
            if record.has_photo {
                self.discard_photo(&record.id);
            }
            return Err(e);
        }

        debug!(email = %record.email, "created contact");
        Ok(record.into_contact(contact.photo.clone()))
    }

    fn replace(
        &mut self,
        mut records: Vec<Record>,
        position: usize,
        contact: &Contact,
    ) -> Result<Contact> {
        let previous = records[position].clone();
        let mut record = previous.clone();
        record.full_name = contact.full_name.clone();
        record.job_position = contact.job_position.clone();
        record.has_photo = contact.photo.is_some();

        // A new photo goes under a new id, so the stored record keeps a
        // valid blob until the list naming the new one is saved.
        if let Some(photo) = &contact.photo {
            record.id = Uuid::new_v4();
            self.backend.write_photo(&record.id, photo)?;
        }
        records[position] = record.clone();
        if let Err(e) = self.backend.save_records(&records) {
            if record.id != previous.id {
                self.discard_photo(&record.id);
            }
            return Err(e);
        }
        if previous.has_photo {
            self.discard_photo(&previous.id);
        }

        debug!(email = %record.email, "updated contact");
        Ok(record.into_contact(contact.photo.clone()))
    }

    /// Best-effort blob removal once the record list no longer needs it.
    /// A blob left behind is an orphan that `doctor` removes.
    fn discard_photo(&self, id: &Uuid) {
        if let Err(e) = self.backend.delete_photo(id) {
            warn!(%id, error = %e, "could not remove photo blob");
        }
    }
}

fn needle(filter: Option<&str>) -> Option<String> {
    filter
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

fn field_contains(field: Option<&str>, needle: Option<&str>) -> bool {
    match (field, needle) {
        (Some(field), Some(needle)) => field.to_lowercase().contains(needle),
        _ => false,
    }
}
