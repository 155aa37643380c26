use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A contact as the rest of the application sees it: a plain value.
///
/// The email is the business key. Two contacts refer to the same stored
/// record when their emails match ignoring case (see [`email_key`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contact {
    pub full_name: Option<String>,
    pub job_position: Option<String>,
    pub email: String,
    /// Encoded image bytes, opaque to the store.
    pub photo: Option<Vec<u8>>,
}

impl Contact {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    pub fn with_job_position(mut self, job_position: impl Into<String>) -> Self {
        self.job_position = Some(job_position.into());
        self
    }

    pub fn with_photo(mut self, photo: Vec<u8>) -> Self {
        self.photo = Some(photo);
        self
    }

    pub fn has_email(&self, email: &str) -> bool {
        email_key(&self.email) == email_key(email)
    }

    /// Name to show in lists; falls back to the email.
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }
}

/// Normalized form of an email used for every key comparison.
pub fn email_key(email: &str) -> String {
    email.to_lowercase()
}

/// Stored form of a contact.
///
/// The photo blob is kept out of the record list and addressed by `id`,
/// so `has_photo` records whether a blob should exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: Uuid,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_position: Option<String>,
    #[serde(default)]
    pub has_photo: bool,
}

impl Record {
    pub fn new(contact: &Contact) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: contact.email.clone(),
            full_name: contact.full_name.clone(),
            job_position: contact.job_position.clone(),
            has_photo: contact.photo.is_some(),
        }
    }

    pub fn matches_email(&self, email: &str) -> bool {
        email_key(&self.email) == email_key(email)
    }

    pub fn into_contact(self, photo: Option<Vec<u8>>) -> Contact {
        Contact {
            full_name: self.full_name,
            job_position: self.job_position,
            email: self.email,
            photo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_match_ignores_case() {
        let contact = Contact::new("Ann@Example.com");
        assert!(contact.has_email("ann@example.com"));
        assert!(!contact.has_email("ann@example.org"));
    }

    #[test]
    fn display_name_falls_back_to_email() {
        assert_eq!(Contact::new("a@b.com").display_name(), "a@b.com");
        assert_eq!(
            Contact::new("a@b.com").with_full_name("  ").display_name(),
            "a@b.com"
        );
        assert_eq!(
            Contact::new("a@b.com").with_full_name("Ann").display_name(),
            "Ann"
        );
    }

    #[test]
    fn record_omits_photo_bytes() {
        let contact = Contact::new("a@b.com")
            .with_full_name("Ann")
            .with_photo(vec![1, 2, 3]);
        let record = Record::new(&contact);
        assert!(record.has_photo);

        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("photo\":["));
        assert!(!json.contains("job_position"));

        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.into_contact(Some(vec![1, 2, 3])), contact);
    }
}
