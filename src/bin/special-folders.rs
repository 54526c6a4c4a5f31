#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! CLI for choosing the special folders of an IMAP account

use anyhow::bail;
use clap::{Parser, Subcommand};
use serde::Serialize;
use special_folders::{
    Effect, Event, FormEvent, FormUiModel, ImapConfig, ImapFolderSource, Role,
    SpecialFoldersForm, SpecialFoldersViewModel, State,
};
use std::sync::{Arc, Mutex, PoisonError};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "special-folders")]
#[command(about = "Pick Archive, Drafts, Sent, Spam and Trash folders of an IMAP account")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List remote folders with their detected type
    Folders,

    /// Load the special folders form and confirm a selection
    Setup {
        /// Folder to use for archived messages
        #[arg(long)]
        archive: Option<String>,

        /// Folder to use for drafts
        #[arg(long)]
        drafts: Option<String>,

        /// Folder to use for sent messages
        #[arg(long)]
        sent: Option<String>,

        /// Folder to use for spam
        #[arg(long)]
        spam: Option<String>,

        /// Folder to use for deleted messages
        #[arg(long)]
        trash: Option<String>,
    },
}

/// Form model shared with the CLI so the choices can be printed after
/// the view model has processed them.
#[derive(Clone, Default)]
struct SharedForm(Arc<Mutex<SpecialFoldersForm>>);

impl SharedForm {
    fn selection(&self, role: Role) -> Option<String> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .selection(role)
            .map(ToString::to_string)
    }
}

impl FormUiModel for SharedForm {
    fn event(&mut self, event: FormEvent) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .event(event);
    }
}

#[derive(Serialize)]
struct RoleReport {
    role: Role,
    candidates: Vec<String>,
    preselected: Option<String>,
    chosen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = ImapConfig::from_env()?;
    let source = ImapFolderSource::new(config);

    match &args.command {
        Command::Folders => cmd_folders(&source, &args).await?,
        Command::Setup {
            archive,
            drafts,
            sent,
            spam,
            trash,
        } => {
            let overrides = [
                (Role::Archive, archive.as_deref()),
                (Role::Drafts, drafts.as_deref()),
                (Role::Sent, sent.as_deref()),
                (Role::Spam, spam.as_deref()),
                (Role::Trash, trash.as_deref()),
            ];
            cmd_setup(source, &args, &overrides).await?;
        }
    }

    Ok(())
}

async fn cmd_folders(source: &ImapFolderSource, args: &Args) -> anyhow::Result<()> {
    let folders = source.list_folders().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&folders)?);
    } else {
        for folder in &folders {
            println!("{:<10} {}", folder.folder_type, folder.display_name);
        }
    }

    Ok(())
}

async fn cmd_setup(
    source: ImapFolderSource,
    args: &Args,
    overrides: &[(Role, Option<&str>)],
) -> anyhow::Result<()> {
    let form = SharedForm::default();
    let view_model = SpecialFoldersViewModel::new(source, form.clone());
    let mut effects = view_model.subscribe_effects();

    view_model.event(Event::LoadSpecialFolders)?;
    view_model.settle().await?;
    if let Some(Effect::LoadFailed(message)) = effects.try_recv() {
        bail!("Loading folders failed: {message}");
    }

    let state = view_model.state();
    for (role, value) in overrides {
        if let Some(value) = value {
            if !state.form_state.field(*role).candidates.contains_key(*value) {
                tracing::warn!("{} is not a candidate for {}", value, role);
            }
            view_model.event(FormEvent::changed(*role, *value))?;
        }
    }

    view_model.event(Event::OnNextClicked)?;
    view_model.settle().await?;

    let report = build_report(&state, &form);
    let confirmed = effects.try_recv() == Some(Effect::NavigateNext);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
        if confirmed {
            println!("\nSelection confirmed.");
        }
    }

    Ok(())
}

fn build_report(state: &State, form: &SharedForm) -> Vec<RoleReport> {
    Role::ALL
        .iter()
        .map(|&role| {
            let field = state.form_state.field(role);
            let preselected = field.selected.as_ref().map(|f| f.display_name.clone());
            RoleReport {
                role,
                candidates: field.candidates.keys().cloned().collect(),
                chosen: form.selection(role).or_else(|| preselected.clone()),
                preselected,
            }
        })
        .collect()
}

fn print_report(report: &[RoleReport]) {
    println!("{:<8} {:<24} Candidates", "Role", "Folder");
    println!("{}", "-".repeat(72));

    for entry in report {
        println!(
            "{:<8} {:<24} {}",
            entry.role,
            truncate(entry.chosen.as_deref().unwrap_or("-"), 24),
            entry.candidates.join(", "),
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}
