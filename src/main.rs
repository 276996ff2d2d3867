use clap::Parser;
use qrkeep::cli::{Cli, Command, CreateKind};
use qrkeep::clipboard::{self, Clipboard};
use qrkeep::config::Config;
use qrkeep::export;
use qrkeep::history::{self, HistoryStore, Outcome};
use qrkeep::payload::encode::{encode_sms, encode_vcard};
use qrkeep::payload::Draft;
use qrkeep::report;
use qrkeep::scan::{self, BarcodeEvent, ScanSession};
use qrkeep::store::{self, BlobStore, MemoryStore};
use std::io::{self, BufRead, Read, Write};

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "qrkeep=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();
}

/// Open the configured history. A backend that cannot be opened degrades to
/// an empty in-memory history rather than failing the command.
fn open_history(config: &Config) -> HistoryStore<Box<dyn BlobStore>> {
    let backend = store::backend_for(config.backend, &config.data_dir);
    match HistoryStore::open(backend) {
        Ok(history) => history,
        Err(e) => {
            tracing::warn!("history unavailable in {}: {e}", config.data_dir.display());
            let fallback: Box<dyn BlobStore> = Box::new(MemoryStore::new());
            HistoryStore::open(fallback).unwrap_or_else(|e| {
                eprintln!("Error opening history: {e}");
                std::process::exit(1);
            })
        }
    }
}

/// The system clipboard when `--copy` was given and one is reachable.
fn open_clipboard(wanted: bool) -> Option<Box<dyn Clipboard>> {
    if !wanted {
        return None;
    }
    match clipboard::system() {
        Ok(clipboard) => Some(clipboard),
        Err(e) => {
            eprintln!("warning: not copying: {e}");
            None
        }
    }
}

fn copy_to(target: &mut Option<Box<dyn Clipboard>>, text: &str) {
    if let Some(target) = target {
        if clipboard::copy(target.as_mut(), text) {
            eprintln!("Copied to clipboard.");
        }
    }
}

fn confirm(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    let _ = io::stdout().flush();

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes")
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let config = Config::from_args(&cli.global).unwrap_or_else(|e| {
        eprintln!("Error loading configuration: {e}");
        std::process::exit(1);
    });

    match cli.command {
        Command::Scan(args) => {
            let mut history = open_history(&config);
            let mut session = ScanSession::new(!args.no_save);
            let mut clipboard = open_clipboard(args.copy);

            let payloads: Box<dyn Iterator<Item = String>> = if args.payloads.is_empty() {
                Box::new(scan::read_detections(io::stdin().lock()))
            } else {
                Box::new(args.payloads.into_iter())
            };

            // each line is one detection, shown and then dismissed
            for text in payloads {
                if let Some(result) = session.on_barcode(BarcodeEvent::qr(text), &mut history) {
                    report::print_scan(&result, args.json);
                    copy_to(&mut clipboard, &result.payload);
                    session.dismiss();
                }
            }

            history.close();
        }
        Command::History(args) => {
            let log = open_history(&config);
            let records = log.list();
            log.close();

            let mut records = match args.search.as_deref() {
                Some(query) => history::filter(&records, query),
                None => records,
            };
            if let Some(limit) = args.limit {
                records.truncate(limit);
            }

            report::print_history(&records, args.json);
        }
        Command::Delete(args) => {
            let mut history = open_history(&config);
            match history.delete_by_id(&args.id) {
                Outcome::Deleted => println!("Deleted {}", args.id),
                Outcome::NotFound => println!("No history entry with ID '{}'.", args.id),
                Outcome::Failed(e) => eprintln!("warning: history unchanged: {e}"),
                _ => {}
            }
            history.close();
        }
        Command::Clear(args) => {
            let mut history = open_history(&config);
            let count = history.list().len();

            if count == 0 {
                println!("History is already empty.");
            } else if args.yes || confirm(&format!("Clear all {count} history entries?")) {
                match history.clear() {
                    Outcome::Failed(e) => eprintln!("warning: history unchanged: {e}"),
                    _ => println!("Cleared {count} entries."),
                }
            } else {
                println!("Aborted.");
            }

            history.close();
        }
        Command::Create(args) => {
            let (payload, missing) = match args.kind {
                CreateKind::Text { text } => (Draft::Text(text).payload(), "text"),
                CreateKind::Url { url } => (Draft::Url(url).payload(), "URL"),
                CreateKind::Wifi { ssid, password, auth } => {
                    let draft = Draft::Wifi {
                        ssid,
                        password: password.unwrap_or_default(),
                        auth: Some(auth),
                    };
                    (draft.payload(), "network name")
                }
                CreateKind::Email { address, subject, body } => {
                    let draft = Draft::Email {
                        address,
                        subject: subject.unwrap_or_default(),
                        body: body.unwrap_or_default(),
                    };
                    (draft.payload(), "email address")
                }
                CreateKind::Phone { number } => (Draft::Phone(number).payload(), "phone number"),
                CreateKind::Sms { number, message } => {
                    (Some(encode_sms(&number, message.as_deref())), "phone number")
                }
                CreateKind::Vcard { name, phone, email, org } => (
                    Some(encode_vcard(&name, phone.as_deref(), email.as_deref(), org.as_deref())),
                    "name",
                ),
            };

            match payload {
                Some(payload) => {
                    println!("{payload}");
                    copy_to(&mut open_clipboard(args.copy), &payload);
                }
                None => {
                    eprintln!("Nothing to encode: the {missing} is empty.");
                    std::process::exit(1);
                }
            }
        }
        Command::Export(args) => {
            let read = match &args.input {
                Some(path) => std::fs::read_to_string(path),
                None => {
                    let mut buffer = String::new();
                    io::stdin().read_to_string(&mut buffer).map(|_| buffer)
                }
            };

            let buffer = read.unwrap_or_else(|e| {
                eprintln!("Export failed: could not read image buffer: {e}");
                std::process::exit(1);
            });

            let out_dir = args.out.unwrap_or_else(|| config.export_dir.clone());
            match export::save_png(&buffer, &out_dir) {
                Ok(path) => println!("{}", path.display()),
                Err(e) => {
                    eprintln!("Export failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        #[cfg(feature = "tui")]
        Command::Browse => {
            let mut history = open_history(&config);
            if let Err(e) = qrkeep::tui::run(&mut history) {
                eprintln!("Error running history browser: {e}");
                std::process::exit(1);
            }
            history.close();
        }
    }
}
