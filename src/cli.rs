use clap::{Parser, Subcommand};
use color_eyre::eyre::{self, eyre};

use crate::api::KronkClient;
use crate::api::types::{NewStatus, Status};
use crate::auth::AuthProvider;
use crate::auth::credentials::load_credentials;
use crate::command::parse_status_ref;
use crate::config::{AppConfig, load_config};
use crate::replies::state::compose_reply;
use crate::replies::build_reply_tree;
use crate::replies::tree::shows_view_all;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "kronktui", about = "TUI and CLI for Kronk and Mastodon-compatible instances")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand)]
pub enum CliCommand {
    /// Launch the interactive TUI (default)
    Tui {
        /// Status ID or URL to open on launch
        status: Option<String>,
    },
    /// Print the reply preview of a status (JSONL)
    Replies {
        /// Status ID or URL
        id_or_url: String,
    },
    /// Print every descendant of a status (JSONL)
    Context {
        /// Status ID or URL
        id_or_url: String,
    },
    /// Post a reply to a status
    Reply {
        /// Status ID or URL
        id_or_url: String,
        /// Reply text; the author's handle is prepended when missing
        text: String,
    },
}

// ---------------------------------------------------------------------------
// Output helpers
// ---------------------------------------------------------------------------

/// Print a list of statuses as JSONL to stdout.
fn print_statuses(statuses: &[Status]) -> eyre::Result<()> {
    for status in statuses {
        let line = serde_json::to_string(&serde_json::json!({ "status": status }))?;
        println!("{line}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Client construction (shared with main.rs TUI path)
// ---------------------------------------------------------------------------

/// Build a `KronkClient` from env credentials + config.
///
/// A missing access token is fine: the client then only reads public data.
pub fn build_api_client(config: &AppConfig) -> eyre::Result<KronkClient> {
    let creds = load_credentials()?;
    let base_url = creds
        .instance_url
        .as_ref()
        .map(|u| u.as_str().to_string())
        .unwrap_or_else(|| config.instance_url.clone());
    Ok(KronkClient::new(&base_url, AuthProvider::new(creds)))
}

// ---------------------------------------------------------------------------
// Command execution
// ---------------------------------------------------------------------------

fn status_id(id_or_url: &str) -> eyre::Result<String> {
    parse_status_ref(id_or_url).ok_or_else(|| eyre!("not a status ID or URL: {id_or_url}"))
}

pub async fn run_command(cmd: CliCommand) -> eyre::Result<()> {
    let config = load_config();
    let client = build_api_client(&config)?;

    match cmd {
        CliCommand::Tui { .. } => {
            unreachable!("tui is handled in main")
        }

        CliCommand::Replies { id_or_url } => {
            let id = status_id(&id_or_url)?;
            let subject = client.get_status(&id).await.map_err(|e| eyre!("{e}"))?;
            let context = client
                .get_status_context(&id)
                .await
                .map_err(|e| eyre!("{e}"))?;

            let tree = build_reply_tree(&context.descendants, &id);
            for node in &tree {
                println!("{}", serde_json::to_string(node)?);
            }
            let summary = serde_json::json!({
                "total": subject.replies_count,
                "shown": tree.len(),
                "view_all": shows_view_all(subject.replies_count, tree.len()),
            });
            println!("{summary}");
        }

        CliCommand::Context { id_or_url } => {
            let id = status_id(&id_or_url)?;
            let context = client
                .get_status_context(&id)
                .await
                .map_err(|e| eyre!("{e}"))?;
            print_statuses(&context.descendants)?;
        }

        CliCommand::Reply { id_or_url, text } => {
            let id = status_id(&id_or_url)?;
            if !client.signed_in() {
                return Err(eyre!("posting requires KRONK_ACCESS_TOKEN"));
            }
            let subject = client.get_status(&id).await.map_err(|e| eyre!("{e}"))?;
            let status = compose_reply(&text, &subject.account.acct)?;
            let created = client
                .post_status(&NewStatus {
                    status,
                    in_reply_to_id: subject.id.clone(),
                    visibility: subject.visibility.narrowest(config.default_visibility),
                })
                .await
                .map_err(|e| eyre!("{e}"))?;
            tracing::info!(id = %created.id, in_reply_to = %subject.id, "reply posted");
            print_statuses(std::slice::from_ref(&created))?;
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
