//! Background store worker.
//!
//! The [`RecordStore`] is moved onto a dedicated thread and every operation
//! reaches it as a job over a channel. Jobs run one at a time in submission
//! order, which makes the worker the single writer of the store. Each job
//! carries its own reply channel; the caller holds the other end as a
//! [`Pending`] result and either blocks on it or polls it.

use crate::error::{ContactsError, Result};
use crate::model::Contact;
use crate::store::backend::StorageBackend;
use crate::store::{DoctorReport, RecordStore, Upserted};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use tracing::{debug, trace, warn};

type Reply<T> = Sender<Result<T>>;

enum Job {
    FetchAll(Reply<Vec<Contact>>),
    FetchOne(String, Reply<Option<Contact>>),
    Search {
        name: Option<String>,
        position: Option<String>,
        reply: Reply<Vec<Contact>>,
    },
    Exists(String, Reply<bool>),
    Create(Contact, Reply<Contact>),
    Update(Contact, Reply<Contact>),
    Upsert(Contact, Reply<Upserted>),
    DeleteOne(String, Reply<Contact>),
    DeleteAll(Reply<usize>),
    Doctor(Reply<DoctorReport>),
    Shutdown,
}

/// The result of a submitted store operation, delivered by the worker.
pub struct Pending<T> {
    rx: Receiver<Result<T>>,
}

impl<T> Pending<T> {
    /// Block until the worker replies.
    pub fn wait(self) -> Result<T> {
        self.rx.recv().unwrap_or(Err(ContactsError::WorkerStopped))
    }

    /// Take the reply if it has arrived.
    ///
    /// Returns `None` while the job is still queued or running. Once a reply
    /// has been taken, the pending result is spent.
    pub fn try_take(&self) -> Option<Result<T>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(ContactsError::WorkerStopped)),
        }
    }
}

/// Cloneable submission side of a [`StoreWorker`].
#[derive(Clone)]
pub struct StoreHandle {
    jobs: Sender<Job>,
}

impl StoreHandle {
    fn submit<T>(&self, job: impl FnOnce(Reply<T>) -> Job) -> Pending<T> {
        let (reply, rx) = channel();
        // A refused job drops its reply sender, so the Pending resolves
        // to WorkerStopped.
        if self.jobs.send(job(reply)).is_err() {
            debug!("store worker gone, job dropped");
        }
        Pending { rx }
    }

    pub fn fetch_all(&self) -> Pending<Vec<Contact>> {
        self.submit(Job::FetchAll)
    }

    pub fn fetch_one(&self, email: &str) -> Pending<Option<Contact>> {
        self.submit(|reply| Job::FetchOne(email.to_string(), reply))
    }

    pub fn search(&self, name: Option<&str>, position: Option<&str>) -> Pending<Vec<Contact>> {
        self.submit(|reply| Job::Search {
            name: name.map(str::to_string),
            position: position.map(str::to_string),
            reply,
        })
    }

    pub fn exists(&self, email: &str) -> Pending<bool> {
        self.submit(|reply| Job::Exists(email.to_string(), reply))
    }

    pub fn create(&self, contact: Contact) -> Pending<Contact> {
        self.submit(|reply| Job::Create(contact, reply))
    }

    pub fn update(&self, contact: Contact) -> Pending<Contact> {
        self.submit(|reply| Job::Update(contact, reply))
    }

    pub fn upsert(&self, contact: Contact) -> Pending<Upserted> {
        self.submit(|reply| Job::Upsert(contact, reply))
    }

    pub fn delete_one(&self, email: &str) -> Pending<Contact> {
        self.submit(|reply| Job::DeleteOne(email.to_string(), reply))
    }

    pub fn delete_all(&self) -> Pending<usize> {
        self.submit(Job::DeleteAll)
    }

    pub fn doctor(&self) -> Pending<DoctorReport> {
        self.submit(Job::Doctor)
    }
}

/// Owns the thread that owns the store.
///
/// Dropping the worker (or calling [`StoreWorker::stop`]) lets every job
/// submitted so far finish, then joins the thread. Jobs submitted after
/// that resolve to `WorkerStopped`.
pub struct StoreWorker {
    jobs: Sender<Job>,
    thread: Option<JoinHandle<()>>,
}

impl StoreWorker {
    pub fn spawn<B>(store: RecordStore<B>) -> Result<Self>
    where
        B: StorageBackend + Send + 'static,
    {
        let (jobs, rx) = channel();
        let thread = thread::Builder::new()
            .name("contact-store".to_string())
            .spawn(move || run(store, rx))
            .map_err(ContactsError::Io)?;

        Ok(Self {
            jobs,
            thread: Some(thread),
        })
    }

    pub fn handle(&self) -> StoreHandle {
        StoreHandle {
            jobs: self.jobs.clone(),
        }
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = self.jobs.send(Job::Shutdown);
            if thread.join().is_err() {
                warn!("store worker panicked");
            }
        }
    }
}

impl Drop for StoreWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run<B: StorageBackend>(mut store: RecordStore<B>, jobs: Receiver<Job>) {
    debug!("store worker started");

    while let Ok(job) = jobs.recv() {
        // Replies to callers that stopped listening are dropped.
        match job {
            Job::FetchAll(reply) => {
                trace!("fetch_all");
                let _ = reply.send(store.fetch_all());
            }
            Job::FetchOne(email, reply) => {
                trace!(%email, "fetch_one");
                let _ = reply.send(store.fetch_one(&email));
            }
            Job::Search {
                name,
                position,
                reply,
            } => {
                trace!(?name, ?position, "search");
                let _ = reply.send(store.search(name.as_deref(), position.as_deref()));
            }
            Job::Exists(email, reply) => {
                let _ = reply.send(store.exists(&email));
            }
            Job::Create(contact, reply) => {
                let _ = reply.send(store.create(&contact));
            }
            Job::Update(contact, reply) => {
                let _ = reply.send(store.update(&contact));
            }
            Job::Upsert(contact, reply) => {
                let _ = reply.send(store.upsert(&contact));
            }
            Job::DeleteOne(email, reply) => {
                let _ = reply.send(store.delete_one(&email));
            }
            Job::DeleteAll(reply) => {
                let _ = reply.send(store.delete_all());
            }
            Job::Doctor(reply) => {
                let _ = reply.send(store.doctor());
            }
            Job::Shutdown => break,
        }
    }

    debug!("store worker stopped");
}
