use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::store::Backend;

#[derive(Parser)]
#[command(name = "qrkeep")]
#[command(about = "Classify scanned QR payloads, compose new ones, and keep a local scan history")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Default)]
pub struct GlobalArgs {
    /// Storage backend for the history
    #[arg(long, global = true, value_enum)]
    pub backend: Option<Backend>,

    /// Directory holding the history (defaults to the platform data dir)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Show debug logging
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Classify decoded QR text and record it in history
    Scan(ScanArgs),

    /// List or search scan history
    History(HistoryArgs),

    /// Delete one history entry by ID
    Delete(DeleteArgs),

    /// Remove all history entries
    Clear(ClearArgs),

    /// Build a QR payload from structured input
    Create(CreateArgs),

    /// Save a rendered QR image (base64 PNG) to disk
    Export(ExportArgs),

    /// Browse history interactively
    #[cfg(feature = "tui")]
    Browse,
}

#[derive(Parser)]
pub struct ScanArgs {
    /// Decoded payloads; reads one per line from stdin when omitted
    pub payloads: Vec<String>,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Classify only, do not record in history
    #[arg(long, default_value_t = false)]
    pub no_save: bool,

    /// Copy each scanned payload to the clipboard
    #[arg(long, default_value_t = false)]
    pub copy: bool,
}

#[derive(Parser)]
pub struct HistoryArgs {
    /// Case-insensitive match on payload or type
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Maximum number of entries to show
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Parser)]
pub struct DeleteArgs {
    /// ID of the entry to delete
    pub id: String,
}

#[derive(Parser)]
pub struct ClearArgs {
    /// Skip confirmation
    #[arg(long, default_value_t = false)]
    pub yes: bool,
}

#[derive(Parser)]
pub struct CreateArgs {
    #[command(subcommand)]
    pub kind: CreateKind,

    /// Copy the generated payload to the clipboard
    #[arg(long, global = true, default_value_t = false)]
    pub copy: bool,
}

#[derive(Subcommand)]
pub enum CreateKind {
    /// Plain text
    Text { text: String },

    /// Website URL
    Url { url: String },

    /// WiFi network credentials
    Wifi {
        ssid: String,
        #[arg(long)]
        password: Option<String>,
        /// Authentication type (WPA, WEP, nopass)
        #[arg(long, default_value = "WPA")]
        auth: String,
    },

    /// Email with optional subject and body
    Email {
        address: String,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        body: Option<String>,
    },

    /// Phone number
    Phone { number: String },

    /// SMS with optional message
    Sms {
        number: String,
        #[arg(long)]
        message: Option<String>,
    },

    /// Contact card
    Vcard {
        name: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        org: Option<String>,
    },
}

#[derive(Parser)]
pub struct ExportArgs {
    /// File holding the base64 PNG (stdin when omitted)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Output directory (defaults to the configured export dir)
    #[arg(long)]
    pub out: Option<PathBuf>,
}
