//! # CLI Layer
//!
//! This module is **one possible UI client** for contactbook. It drives a
//! [`ContactListModel`] the way a GUI would, then prints the resulting list
//! and events.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Decides the process exit code
//! - Handles argument parsing and logging setup
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Opens the store, starts the worker, builds the model
//! - `handle_*()`: Per-command handlers
//! - `finish()`: Settles the model and prints what happened

use super::print::{
    info, print_contact, print_contacts, print_doctor, print_events, success, warning,
};
use super::setup::{Cli, Commands};
use clap::Parser;
use contactbook::config::{ContactsConfig, CONFIG_KEYS};
use contactbook::error::{ContactsError, Result};
use contactbook::list_model::{ContactListModel, ModelEvent};
use contactbook::model::Contact;
use contactbook::store::fs_backend::FsBackend;
use contactbook::store::FileStore;
use contactbook::worker::StoreWorker;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::mpsc::Receiver;
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "CONTACTBOOK_DATA";
/// Environment variable holding a tracing filter, e.g. `contactbook=debug`.
pub const LOG_ENV: &str = "CONTACTBOOK_LOG";

struct AppContext {
    // Must drop before `worker`, whose Drop joins the store thread.
    model: ContactListModel,
    events: Receiver<ModelEvent>,
    worker: StoreWorker,
    config: ContactsConfig,
    data_dir: PathBuf,
}

pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let data_dir = resolve_data_dir(cli.data_dir.as_deref())?;
    debug!(data_dir = %data_dir.display(), "resolved data directory");

    let mut ctx = init_context(data_dir)?;

    match cli.command {
        Some(Commands::List) | None => handle_list(&mut ctx),
        Some(Commands::Search { query }) => handle_search(&mut ctx, query.join(" ")),
        Some(Commands::Save {
            email,
            name,
            position,
            photo,
        }) => handle_save(&mut ctx, email, name, position, photo),
        Some(Commands::Edit {
            email,
            name,
            position,
            photo,
            clear_photo,
        }) => handle_edit(&mut ctx, email, name, position, photo, clear_photo),
        Some(Commands::Show { email }) => handle_show(&ctx, &email),
        Some(Commands::Delete { emails }) => handle_delete(&mut ctx, emails),
        Some(Commands::Clear { yes }) => handle_clear(&mut ctx, yes),
        Some(Commands::Doctor) => handle_doctor(&ctx),
        Some(Commands::Config { key, value }) => handle_config(&mut ctx, key, value),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

fn resolve_data_dir(flag: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir.to_path_buf());
    }
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    ProjectDirs::from("com", "contactbook", "contactbook")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| ContactsError::Config("Could not determine data directory".to_string()))
}

fn init_context(data_dir: PathBuf) -> Result<AppContext> {
    let config = ContactsConfig::load(&data_dir)?;
    let store = FileStore::open(FsBackend::new(data_dir.clone()))?;
    let worker = StoreWorker::spawn(store)?;
    let (model, events) = ContactListModel::new(worker.handle());
    let model = model.with_min_search_len(config.min_search_len);

    Ok(AppContext {
        model,
        events,
        worker,
        config,
        data_dir,
    })
}

/// Waits for every queued model operation and prints its events.
fn finish(ctx: &mut AppContext) -> ExitCode {
    ctx.model.settle();
    let events: Vec<ModelEvent> = ctx.events.try_iter().collect();
    if print_events(&events) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn handle_list(ctx: &mut AppContext) -> Result<ExitCode> {
    ctx.model.load_all();
    let code = finish(ctx);
    print_contacts(ctx.model.contacts(), ctx.config.list_width);
    Ok(code)
}

fn handle_search(ctx: &mut AppContext, query: String) -> Result<ExitCode> {
    if !ctx.model.apply_query(&query) {
        info(&format!(
            "Search needs at least {} characters.",
            ctx.config.min_search_len
        ));
        return Ok(ExitCode::SUCCESS);
    }
    let code = finish(ctx);
    print_contacts(ctx.model.contacts(), ctx.config.list_width);
    Ok(code)
}

fn handle_save(
    ctx: &mut AppContext,
    email: String,
    name: String,
    position: String,
    photo: Option<PathBuf>,
) -> Result<ExitCode> {
    let mut contact = Contact::new(email)
        .with_full_name(name)
        .with_job_position(position);
    if let Some(path) = photo {
        contact = contact.with_photo(read_photo(&path)?);
    }
    ctx.model.save(contact);
    Ok(finish(ctx))
}

fn handle_edit(
    ctx: &mut AppContext,
    email: String,
    name: Option<String>,
    position: Option<String>,
    photo: Option<PathBuf>,
    clear_photo: bool,
) -> Result<ExitCode> {
    let mut contact = ctx
        .worker
        .handle()
        .fetch_one(&email)
        .wait()?
        .ok_or_else(|| ContactsError::NotFound(email.clone()))?;

    if let Some(name) = name {
        contact.full_name = Some(name);
    }
    if let Some(position) = position {
        contact.job_position = Some(position);
    }
    if let Some(path) = photo {
        contact.photo = Some(read_photo(&path)?);
    } else if clear_photo {
        contact.photo = None;
    }

    ctx.model.save(contact);
    Ok(finish(ctx))
}

fn handle_show(ctx: &AppContext, email: &str) -> Result<ExitCode> {
    let contact = ctx
        .worker
        .handle()
        .fetch_one(email)
        .wait()?
        .ok_or_else(|| ContactsError::NotFound(email.to_string()))?;
    print_contact(&contact);
    Ok(ExitCode::SUCCESS)
}

fn handle_delete(ctx: &mut AppContext, emails: Vec<String>) -> Result<ExitCode> {
    for email in &emails {
        ctx.model.delete(email);
    }
    Ok(finish(ctx))
}

fn handle_clear(ctx: &mut AppContext, yes: bool) -> Result<ExitCode> {
    if !yes {
        warning("This deletes every contact. Run again with --yes to confirm.");
        return Ok(ExitCode::FAILURE);
    }
    ctx.model.delete_all();
    Ok(finish(ctx))
}

fn handle_doctor(ctx: &AppContext) -> Result<ExitCode> {
    let report = ctx.worker.handle().doctor().wait()?;
    print_doctor(&report);
    info(&format!("Data directory: {}", ctx.data_dir.display()));
    Ok(ExitCode::SUCCESS)
}

fn handle_config(
    ctx: &mut AppContext,
    key: Option<String>,
    value: Option<String>,
) -> Result<ExitCode> {
    let config = &mut ctx.config;

    match (key, value) {
        (None, _) => {
            for key in CONFIG_KEYS {
                if let Some(current) = config.get(key) {
                    println!("{} = {}", key, current);
                }
            }
        }
        (Some(key), None) => match config.get(&key) {
            Some(current) => println!("{} = {}", key, current),
            None => {
                return Err(ContactsError::Config(format!(
                    "Unknown config key: {} (expected one of: {})",
                    key,
                    CONFIG_KEYS.join(", ")
                )))
            }
        },
        (Some(key), Some(value)) => {
            config.set(&key, &value)?;
            config.save(&ctx.data_dir)?;
            let current = config.get(&key).unwrap_or(value);
            success(&format!("{} set to {}", key, current));
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn read_photo(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        ContactsError::Io(std::io::Error::new(
            e.kind(),
            format!("cannot read photo {}: {}", path.display(), e),
        ))
    })
}
