use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "mediclerk", version)]
#[command(about = "Specialty-specific clerking notes from the terminal")]
pub struct Cli {
    /// Clerking API base URL, overriding the config file.
    #[arg(long, global = true, env = "MEDICLERK_API_URL")]
    pub api_url: Option<String>,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the available specialties
    Specialties,
    /// Show the form fields of a specialty
    Fields {
        /// Specialty id, e.g. "surgery"
        specialty: String,
    },
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Create an account
    Register,
    /// Forget the saved session
    Logout,
    /// List your clerking notes
    List {
        /// Only notes whose patient first or last name contains this
        #[arg(long)]
        search: Option<String>,
    },
    /// Print one clerking note
    Show { id: String },
    /// Clerk a new patient
    New {
        #[arg(long)]
        specialty: String,
        /// JSON object of field values; prompts interactively when omitted
        #[arg(long)]
        values: Option<PathBuf>,
    },
    /// Edit an existing clerking note
    Edit {
        id: String,
        /// JSON object of field values to change
        #[arg(long)]
        values: Option<PathBuf>,
    },
    /// Delete a clerking note
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Export a clerking note as DOCX
    Export {
        id: String,
        /// Output path; defaults to a name derived from the note
        #[arg(long)]
        out: Option<PathBuf>,
        /// Tera template to render instead of the built-in layout
        #[arg(long)]
        template: Option<PathBuf>,
    },
    /// Ask for AI follow-up questions on one section
    Suggest {
        #[arg(long)]
        specialty: String,
        /// Field key, e.g. "presenting_complaints"
        #[arg(long)]
        field: String,
        /// JSON object of the values documented so far
        #[arg(long)]
        values: Option<PathBuf>,
    },
}
