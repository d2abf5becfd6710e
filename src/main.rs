mod auth;
mod error;
mod export;
mod filter;
mod models;
mod registry;
mod storage;
mod tui;

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use auth::{CredentialStore, SessionHolder};
use filter::{FilterState, Tab};
use models::{ApplicationDraft, Position, Role, SessionUser, Status};
use registry::ApplicationStore;
use storage::{APPLICATIONS_KEY, Storage};

#[derive(Parser)]
#[command(name = "hrd")]
#[command(about = "HRD application tracking - register, tag, annotate and export job applications")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FilterArgs {
    /// Status tab (all, pending, lolos, wawancara, test, ditolak)
    #[arg(short, long, default_value = "all")]
    tab: Tab,

    /// Search by name, email or position (case-insensitive substring)
    #[arg(short, long)]
    search: Option<String>,

    /// Filter by status (pending, lolos, wawancara, test, ditolak)
    #[arg(long)]
    status: Option<Status>,

    /// Filter by position (frontend, backend, ui, product)
    #[arg(short, long)]
    position: Option<Position>,
}

impl FilterArgs {
    fn into_state(self) -> FilterState {
        FilterState {
            tab: self.tab,
            search: self.search.unwrap_or_default(),
            status: self.status,
            position: self.position,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new user and log in
    Register {
        /// Full name
        #[arg(long)]
        name: String,

        /// Email address (must be unique)
        #[arg(long)]
        email: String,

        /// Password (at least 6 characters)
        #[arg(long)]
        password: String,

        /// Role (staff, hrd, admin)
        #[arg(long, default_value = "staff")]
        role: Role,
    },

    /// Log in with an existing account
    Login {
        /// Email address
        email: String,

        /// Password
        password: String,
    },

    /// Log out of the current session
    Logout,

    /// Show the logged-in user
    Dashboard,

    /// Add a job application
    Add {
        /// Applicant name
        #[arg(long)]
        name: String,

        /// Applicant email
        #[arg(long)]
        email: String,

        /// Contact number
        #[arg(long)]
        contact: String,

        /// Position applied for (frontend, backend, ui, product)
        #[arg(long)]
        position: Position,

        /// Initial status
        #[arg(long, default_value = "pending")]
        status: Status,

        /// Applied date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        applied_date: Option<NaiveDate>,

        /// Interview date (YYYY-MM-DD)
        #[arg(long)]
        interview_date: Option<NaiveDate>,
    },

    /// List applications
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show application details
    Show {
        /// Application ID
        id: u64,
    },

    /// Edit an application (unset flags keep current values)
    Edit {
        /// Application ID
        id: u64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        contact: Option<String>,

        #[arg(long)]
        position: Option<Position>,

        #[arg(long)]
        status: Option<Status>,

        #[arg(long)]
        applied_date: Option<NaiveDate>,

        #[arg(long)]
        interview_date: Option<NaiveDate>,
    },

    /// Set an application's status
    Status {
        /// Application ID
        id: u64,

        /// New status (pending, lolos, wawancara, test, ditolak)
        status: Status,
    },

    /// Add a note to an application
    Note {
        /// Application ID
        id: u64,

        /// Note text
        text: String,
    },

    /// Attach document names to an application (names only, no content)
    Attach {
        /// Application ID
        id: u64,

        /// File names to record
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Remove an application
    Remove {
        /// Application ID
        id: u64,
    },

    /// Export the filtered applications to an Excel file
    Export {
        #[command(flatten)]
        filter: FilterArgs,

        /// Output path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Browse applications interactively
    Browse {
        #[command(flatten)]
        filter: FilterArgs,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let storage = Storage::open()?;
    let mut session = SessionHolder::restore(&storage);

    match cli.command {
        Commands::Register {
            name,
            email,
            password,
            role,
        } => {
            let creds = CredentialStore::new(&storage);
            let account = creds.register(&name, &email, &password, role)?;
            session.establish(&account)?;
            println!("Registered and logged in as {} ({})", account.name, account.role);
        }

        Commands::Login { email, password } => {
            let creds = CredentialStore::new(&storage);
            let account = creds.authenticate(&email, &password)?;
            session.establish(&account)?;
            println!("Logged in as {} ({})", account.name, account.role);
        }

        Commands::Logout => {
            session.clear()?;
            println!("Logged out.");
        }

        Commands::Dashboard => {
            let user = require_login(&session)?;
            println!("Dashboard");
            println!("{}", "-".repeat(40));
            println!("Name:  {}", user.name);
            println!("Email: {}", user.email);
            println!("Role:  {}", user.role);
        }

        Commands::Add {
            name,
            email,
            contact,
            position,
            status,
            applied_date,
            interview_date,
        } => {
            require_login(&session)?;
            let mut records = load_records(&storage);
            let draft = ApplicationDraft {
                name,
                email,
                contact,
                position,
                status,
                applied_date,
                interview_date,
            };
            let id = records.create(draft)?.id;
            save_records(&storage, &records)?;
            println!("Added application #{}", id);
        }

        Commands::List { filter } => {
            require_login(&session)?;
            let records = load_records(&storage);
            let visible = filter::apply(records.list(), &filter.into_state());
            if visible.is_empty() {
                println!("No applications found matching your criteria.");
            } else {
                println!(
                    "{:<6} {:<20} {:<20} {:<10} {:<12} {:<12}",
                    "ID", "NAME", "POSITION", "STATUS", "APPLIED", "INTERVIEW"
                );
                println!("{}", "-".repeat(84));
                for record in &visible {
                    let interview = record
                        .interview_date
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "{:<6} {:<20} {:<20} {:<10} {:<12} {:<12}",
                        record.id,
                        truncate(&record.name, 18),
                        truncate(record.position.as_str(), 18),
                        record.status.as_str(),
                        record.applied_date.to_string(),
                        interview
                    );
                }
            }
        }

        Commands::Show { id } => {
            require_login(&session)?;
            let records = load_records(&storage);
            match records.get(id) {
                Some(record) => {
                    println!("Application #{}", record.id);
                    println!("Name: {}", record.name);
                    println!("Email: {}", record.email);
                    println!("Contact: {}", record.contact);
                    println!("Position: {}", record.position);
                    println!("Status: {}", record.status);
                    println!("Applied: {}", record.applied_date);
                    if let Some(interview) = record.interview_date {
                        println!("Interview: {}", interview);
                    }

                    println!("\nDocuments ({}):", record.documents.len());
                    for name in &record.documents {
                        println!("  - {}", name);
                    }

                    println!("\nNotes ({}):", record.notes.len());
                    for note in &record.notes {
                        println!("  [{}] {}: {}", note.date, note.author, note.text);
                    }
                }
                None => {
                    println!("Application #{} not found.", id);
                }
            }
        }

        Commands::Edit {
            id,
            name,
            email,
            contact,
            position,
            status,
            applied_date,
            interview_date,
        } => {
            require_login(&session)?;
            let mut records = load_records(&storage);
            let Some(existing) = records.get(id).cloned() else {
                println!("Application #{} not found.", id);
                return Ok(());
            };
            let draft = ApplicationDraft {
                name: name.unwrap_or(existing.name),
                email: email.unwrap_or(existing.email),
                contact: contact.unwrap_or(existing.contact),
                position: position.unwrap_or(existing.position),
                status: status.unwrap_or(existing.status),
                applied_date: Some(applied_date.unwrap_or(existing.applied_date)),
                interview_date: interview_date.or(existing.interview_date),
            };
            records.update(id, draft)?;
            save_records(&storage, &records)?;
            println!("Updated application #{}", id);
        }

        Commands::Status { id, status } => {
            require_login(&session)?;
            let mut records = load_records(&storage);
            if records.set_status(id, status) {
                save_records(&storage, &records)?;
                println!("Marked application #{} as {}.", id, status);
            } else {
                println!("Application #{} not found.", id);
            }
        }

        Commands::Note { id, text } => {
            let user = require_login(&session)?;
            let mut records = load_records(&storage);
            if records.append_note(id, &text, &user.name)? {
                save_records(&storage, &records)?;
                println!("Added note to application #{}", id);
            } else {
                println!("Application #{} not found.", id);
            }
        }

        Commands::Attach { id, names } => {
            require_login(&session)?;
            let mut records = load_records(&storage);
            let count = names.len();
            if records.append_documents(id, names) {
                save_records(&storage, &records)?;
                println!("Attached {} document(s) to application #{}", count, id);
            } else {
                println!("Application #{} not found.", id);
            }
        }

        Commands::Remove { id } => {
            require_login(&session)?;
            let mut records = load_records(&storage);
            if records.remove(id) {
                save_records(&storage, &records)?;
                println!("Removed application #{}", id);
            } else {
                println!("Application #{} not found.", id);
            }
        }

        Commands::Export { filter, output } => {
            require_login(&session)?;
            let records = load_records(&storage);
            let visible = filter::apply(records.list(), &filter.into_state());
            let path = output.unwrap_or_else(|| PathBuf::from(export::DEFAULT_EXPORT_FILE));
            match export::write_xlsx(&visible, &path) {
                Ok(()) => {
                    println!(
                        "Exported {} application(s) to {}",
                        visible.len(),
                        path.display()
                    );
                }
                Err(err) => {
                    // Never fatal: the user simply does not receive a file
                    tracing::error!(%err, "export failed");
                    println!("Export failed; no file was written.");
                }
            }
        }

        Commands::Browse { filter } => {
            require_login(&session)?;
            let mut records = load_records(&storage);
            let changed = tui::run_browse(&mut records, filter.into_state())?;
            if changed {
                save_records(&storage, &records)?;
            }
        }
    }

    Ok(())
}

fn require_login(session: &SessionHolder) -> Result<SessionUser> {
    session
        .current()
        .cloned()
        .ok_or_else(|| anyhow!("Not logged in. Run 'hrd login <email> <password>' first."))
}

fn load_records(storage: &Storage) -> ApplicationStore {
    storage
        .read(APPLICATIONS_KEY)
        .unwrap_or_else(ApplicationStore::with_sample_data)
}

fn save_records(storage: &Storage, records: &ApplicationStore) -> Result<()> {
    storage.write(APPLICATIONS_KEY, records)?;
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}...", &s[..max.saturating_sub(3)])
    }
}
