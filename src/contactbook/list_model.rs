//! # Contact List Model
//!
//! [`ContactListModel`] keeps an in-memory list of contacts that mirrors the
//! store, and tells its observer how every operation went.
//!
//! ## Operation flow
//!
//! ```text
//! caller ──op──▶ model ──job──▶ StoreWorker ──▶ RecordStore
//!                  ▲                 │
//!                  └──── reply ──────┘
//!        pump()/settle(): apply reply to cache, emit ModelEvent
//! ```
//!
//! Operations are submitted to the worker as soon as they are called and run
//! there in call order. Their replies are applied to the cache in the same
//! order, by [`ContactListModel::pump`] (non-blocking) or
//! [`ContactListModel::settle`] (blocking). The cache is only ever changed by
//! a confirmed reply.
//!
//! ## Events
//!
//! Each operation produces exactly one [`ModelEvent`] on the channel returned
//! by [`ContactListModel::new`]: `Changed` on success, `Error` with a
//! user-readable message on failure. Failures are never retried.

use crate::error::ContactsError;
use crate::model::Contact;
use crate::store::Upserted;
use crate::validation::validate_contact;
use crate::worker::{Pending, StoreHandle};
use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use tracing::{debug, error, warn};

/// Shortest query that triggers a store search in [`ContactListModel::apply_query`].
pub const DEFAULT_MIN_SEARCH_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Loaded(usize),
    Searched { query: String, matches: usize },
    Created(Contact),
    Updated(Contact),
    Deleted(Contact),
    Cleared(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEvent {
    Changed(Change),
    Error(String),
}

enum InFlight {
    Load(Pending<Vec<Contact>>),
    Search {
        query: String,
        pending: Pending<Vec<Contact>>,
    },
    Save(Pending<Upserted>),
    Delete(Pending<Contact>),
    Clear(Pending<usize>),
    /// Refused before reaching the store; reported in turn with the rest.
    Rejected(String),
}

pub struct ContactListModel {
    store: StoreHandle,
    contacts: Vec<Contact>,
    in_flight: VecDeque<InFlight>,
    events: Sender<ModelEvent>,
    min_search_len: usize,
}

impl ContactListModel {
    pub fn new(store: StoreHandle) -> (Self, Receiver<ModelEvent>) {
        let (events, rx) = channel();
        let model = Self {
            store,
            contacts: Vec::new(),
            in_flight: VecDeque::new(),
            events,
            min_search_len: DEFAULT_MIN_SEARCH_LEN,
        };
        (model, rx)
    }

    pub fn with_min_search_len(mut self, len: usize) -> Self {
        self.min_search_len = len;
        self
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Replace the list with every stored contact.
    pub fn load_all(&mut self) {
        let pending = self.store.fetch_all();
        self.in_flight.push_back(InFlight::Load(pending));
    }

    /// Replace the list with contacts whose name or position contains `query`.
    pub fn search(&mut self, query: &str) {
        let pending = self.store.search(Some(query), Some(query));
        self.in_flight.push_back(InFlight::Search {
            query: query.to_string(),
            pending,
        });
    }

    /// Search-box behaviour: an empty query shows everything, a long enough
    /// query searches, anything in between leaves the list alone.
    ///
    /// Returns whether an operation was issued.
    pub fn apply_query(&mut self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            self.load_all();
            true
        } else if query.chars().count() >= self.min_search_len {
            self.search(query);
            true
        } else {
            false
        }
    }

    /// Validate, then create or update the contact with this email.
    pub fn save(&mut self, contact: Contact) {
        if let Err(e) = validate_contact(&contact) {
            let message = ContactsError::from(e).to_string();
            debug!(email = %contact.email, %message, "rejected contact");
            self.in_flight.push_back(InFlight::Rejected(message));
            return;
        }
        let pending = self.store.upsert(contact);
        self.in_flight.push_back(InFlight::Save(pending));
    }

    pub fn delete(&mut self, email: &str) {
        let pending = self.store.delete_one(email);
        self.in_flight.push_back(InFlight::Delete(pending));
    }

    pub fn delete_all(&mut self) {
        let pending = self.store.delete_all();
        self.in_flight.push_back(InFlight::Clear(pending));
    }

    /// Apply every reply that has already arrived, oldest first, stopping at
    /// the first operation still running. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(head) = self.in_flight.front() {
            let Some(event) = poll(head) else {
                break;
            };
            self.in_flight.pop_front();
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Block until every submitted operation has been applied.
    pub fn settle(&mut self) -> usize {
        let mut applied = 0;
        while let Some(op) = self.in_flight.pop_front() {
            let event = wait(op);
            self.apply(event);
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, outcome: Outcome) {
        let event = match outcome {
            Outcome::Loaded(contacts) => {
                let count = contacts.len();
                self.contacts = contacts;
                ModelEvent::Changed(Change::Loaded(count))
            }
            Outcome::Searched { query, contacts } => {
                let matches = contacts.len();
                self.contacts = contacts;
                ModelEvent::Changed(Change::Searched { query, matches })
            }
            Outcome::Saved(Upserted::Created(contact)) => {
                self.contacts.push(contact.clone());
                ModelEvent::Changed(Change::Created(contact))
            }
            Outcome::Saved(Upserted::Updated(contact)) => {
                match self.position_of(&contact.email) {
                    Some(i) => self.contacts[i] = contact.clone(),
                    None => self.contacts.push(contact.clone()),
                }
                ModelEvent::Changed(Change::Updated(contact))
            }
            Outcome::Deleted(contact) => {
                self.contacts.retain(|c| !c.has_email(&contact.email));
                ModelEvent::Changed(Change::Deleted(contact))
            }
            Outcome::Cleared(count) => {
                self.contacts.clear();
                ModelEvent::Changed(Change::Cleared(count))
            }
            Outcome::Failed(e) => {
                if e.is_storage() {
                    error!(error = %e, "store operation failed");
                } else {
                    warn!(error = %e, "contact operation refused");
                }
                ModelEvent::Error(e.to_string())
            }
            Outcome::Rejected(message) => ModelEvent::Error(message),
        };
        self.emit(event);
    }

    fn position_of(&self, email: &str) -> Option<usize> {
        self.contacts.iter().position(|c| c.has_email(email))
    }

    fn emit(&self, event: ModelEvent) {
        // The observer may have gone away; the cache is still current.
        if self.events.send(event).is_err() {
            debug!("model observer disconnected");
        }
    }
}

enum Outcome {
    Loaded(Vec<Contact>),
    Searched {
        query: String,
        contacts: Vec<Contact>,
    },
    Saved(Upserted),
    Deleted(Contact),
    Cleared(usize),
    Failed(ContactsError),
    Rejected(String),
}

fn poll(op: &InFlight) -> Option<Outcome> {
    Some(match op {
        InFlight::Load(p) => outcome(p.try_take()?, Outcome::Loaded),
        InFlight::Search { query, pending } => outcome(pending.try_take()?, |contacts| {
            Outcome::Searched {
                query: query.clone(),
                contacts,
            }
        }),
        InFlight::Save(p) => outcome(p.try_take()?, Outcome::Saved),
        InFlight::Delete(p) => outcome(p.try_take()?, Outcome::Deleted),
        InFlight::Clear(p) => outcome(p.try_take()?, Outcome::Cleared),
        InFlight::Rejected(message) => Outcome::Rejected(message.clone()),
    })
}

fn wait(op: InFlight) -> Outcome {
    match op {
        InFlight::Load(p) => outcome(p.wait(), Outcome::Loaded),
        InFlight::Search { query, pending } => {
            outcome(pending.wait(), |contacts| Outcome::Searched { query, contacts })
        }
        InFlight::Save(p) => outcome(p.wait(), Outcome::Saved),
        InFlight::Delete(p) => outcome(p.wait(), Outcome::Deleted),
        InFlight::Clear(p) => outcome(p.wait(), Outcome::Cleared),
        InFlight::Rejected(message) => Outcome::Rejected(message),
    }
}

fn outcome<T>(result: crate::error::Result<T>, ok: impl FnOnce(T) -> Outcome) -> Outcome {
    match result {
        Ok(value) => ok(value),
        Err(e) => Outcome::Failed(e),
    }
}
