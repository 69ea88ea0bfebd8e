//! folio CLI - interactive chat loop over the conversation session manager.
//!
//! The CLI plays the role of the page UI: it renders the transcript,
//! forwards submissions to the controller, and stands in for the login
//! flow by writing the identity slot on `/login` and `/logout`.

use anyhow::{Context, Result};
use clap::Parser;
use folio_core::assistant::AssistantClient;
use folio_core::conversation::{ConversationController, SubmitOutcome};
use folio_core::identity::{Identity, IdentitySlot};
use folio_core::transcript::{Turn, TurnRole};
use folio_infrastructure::{FolioPaths, TieredTranscriptRepository, profile};
use folio_interaction::{ApiAssistantClient, ScriptedAssistant};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "folio - chat with the portfolio assistant", long_about = None)]
struct Cli {
    /// Use the offline scripted assistant instead of the remote endpoint
    #[arg(long)]
    offline: bool,

    /// Assistant endpoint URL (overrides config.json and FOLIO_ASSISTANT_URL)
    #[arg(long)]
    endpoint: Option<String>,

    /// Base directory for folio data (default: ~/.folio)
    #[arg(long)]
    base_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let paths = match cli.base_dir {
        Some(dir) => FolioPaths::new(dir),
        None => FolioPaths::default_location().context("Failed to resolve folio base directory")?,
    };
    std::fs::create_dir_all(paths.base_dir()).context("Failed to create folio base directory")?;

    let repository = Arc::new(
        TieredTranscriptRepository::new(paths.transcripts_dir())
            .context("Failed to initialize transcript storage")?,
    );

    let slot = IdentitySlot::new(profile::load_initial_identity(&paths));

    let assistant: Arc<dyn AssistantClient> = if cli.offline {
        Arc::new(ScriptedAssistant::new())
    } else {
        let client = match cli.endpoint {
            Some(endpoint) => ApiAssistantClient::new(endpoint),
            None => ApiAssistantClient::from_config(&paths),
        };
        tracing::info!(endpoint = %client.endpoint(), "Using remote assistant");
        Arc::new(client)
    };

    let mut controller = ConversationController::new(repository, assistant, slot.watch());
    controller.start().await.context("Failed to start conversation")?;

    render_all(controller.transcript());
    println!("(/login <nom>, /logout, /quit)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        match input {
            "/quit" => break,
            "/logout" => {
                slot.set(Identity::Anonymous);
                if controller.sync_identity().await? {
                    render_all(controller.transcript());
                }
            }
            _ if input.starts_with("/login") => {
                let name = input.trim_start_matches("/login").trim();
                if name.is_empty() {
                    println!("usage: /login <nom>");
                    continue;
                }
                slot.set(Identity::named(name));
                if controller.sync_identity().await? {
                    render_all(controller.transcript());
                }
            }
            _ => {
                let seen = controller.transcript().len();
                let identity_before = controller.identity().clone();

                match controller.submit(input).await {
                    Ok(SubmitOutcome::Submitted) => {
                        if controller.identity() == &identity_before {
                            render_new(controller.transcript(), seen);
                        } else {
                            // The turn settled and a deferred identity
                            // change re-hydrated the transcript.
                            render_all(controller.transcript());
                        }
                    }
                    Ok(SubmitOutcome::Ignored) | Ok(SubmitOutcome::Busy) => {}
                    Err(err) => {
                        tracing::warn!(error = %err, "Submission failed");
                        eprintln!("(erreur de stockage, la conversation reste disponible)");
                    }
                }
            }
        }
    }

    Ok(())
}

fn render_all(turns: &[Turn]) {
    for turn in turns {
        render_turn(turn);
    }
}

fn render_new(turns: &[Turn], seen: usize) {
    for turn in &turns[seen..] {
        // The user turn was typed just above; only echo the assistant side.
        if turn.role == TurnRole::Assistant {
            render_turn(turn);
        }
    }
}

fn render_turn(turn: &Turn) {
    match turn.role {
        TurnRole::Assistant => println!("assistant> {}", turn.text),
        TurnRole::User => println!("vous> {}", turn.text),
    }
}
