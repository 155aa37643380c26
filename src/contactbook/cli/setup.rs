use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "contactbook", bin_name = "contactbook", version)]
#[command(about = "Address book for the command line, keyed by email", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (defaults to $CONTACTBOOK_DATA, then the platform data dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all contacts
    #[command(alias = "ls")]
    List,

    /// Search contacts by name or job position
    Search {
        /// Text to look for (an empty query lists everything)
        #[arg(num_args = 0..)]
        query: Vec<String>,
    },

    /// Add a contact, or update the one with the same email
    #[command(alias = "add")]
    Save {
        /// Email address (the contact's key)
        #[arg(short, long)]
        email: String,

        /// Full name
        #[arg(short, long)]
        name: String,

        /// Job position
        #[arg(short, long)]
        position: String,

        /// Image file to use as the contact photo
        #[arg(long, value_name = "FILE")]
        photo: Option<PathBuf>,
    },

    /// Change fields of an existing contact
    #[command(alias = "e")]
    Edit {
        /// Email of the contact to edit
        email: String,

        /// New full name
        #[arg(short, long)]
        name: Option<String>,

        /// New job position
        #[arg(short, long)]
        position: Option<String>,

        /// Replace the photo with this image file
        #[arg(long, value_name = "FILE", conflicts_with = "clear_photo")]
        photo: Option<PathBuf>,

        /// Remove the photo
        #[arg(long)]
        clear_photo: bool,
    },

    /// Show one contact
    #[command(alias = "v")]
    Show {
        /// Email of the contact
        email: String,
    },

    /// Delete one or more contacts
    #[command(alias = "rm")]
    Delete {
        /// Emails of the contacts to delete
        #[arg(required = true, num_args = 1..)]
        emails: Vec<String>,
    },

    /// Delete every contact
    Clear {
        /// Confirm deleting everything
        #[arg(long)]
        yes: bool,
    },

    /// Check and repair the data directory
    Doctor,

    /// Get or set configuration
    Config {
        /// Configuration key (min-search-len, list-width)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}
