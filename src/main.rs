//! ScrollWise: command-line client for the bookmarks service.
//!
//! Each subcommand loads one screen (or performs one action) against the
//! configured API and prints it as text.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use scrollwise::app::App;
use scrollwise::services::logging;
use scrollwise::types::bookmark::NewBookmark;
use scrollwise::types::settings::DEFAULT_LOG_FILTER;
use scrollwise::ui::text;

#[derive(Parser, Debug)]
#[command(name = "scrollwise", version, about)]
struct Args {
    /// Settings file. Defaults to $SCROLLWISE_CONFIG or the platform config dir.
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all bookmarks.
    Bookmarks {
        #[arg(long, short)]
        query: Option<String>,
        /// Fetch summaries for the listed bookmarks before printing.
        #[arg(long)]
        summaries: bool,
    },
    /// Bookmarks grouped by collection, or one collection with --id.
    Collections {
        #[arg(long)]
        id: Option<i64>,
        #[arg(long, short)]
        query: Option<String>,
    },
    /// Bookmarks grouped by tag, or one tag with --id.
    Tags {
        #[arg(long)]
        id: Option<i64>,
        #[arg(long, short)]
        query: Option<String>,
    },
    /// Show the summary of a bookmark, generating it if none is saved.
    Summary {
        id: i64,
        /// Generate a fresh summary even if one is saved.
        #[arg(long)]
        regenerate: bool,
    },
    /// Save a bookmark.
    AddBookmark {
        text: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        collection: Option<i64>,
        #[arg(long = "tag")]
        tags: Vec<i64>,
    },
    /// Create a collection.
    AddCollection { name: String },
    /// Create a tag.
    AddTag { name: String },
    /// Store a text/URL submission.
    Submit { text: String },
    /// List submissions.
    Submissions {
        /// Summarize this submission before printing.
        #[arg(long)]
        summarize: Option<i64>,
    },
    /// Show or change the stored settings.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the settings file contents (defaults if it does not exist).
    Show,
    /// Set one setting. The value is parsed as JSON, else taken as a string.
    Set { key: String, value: String },
    /// Restore the default settings.
    Reset,
}

fn setting_value(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

fn settings_text(settings: &scrollwise::types::settings::ClientSettings) -> Result<String, String> {
    serde_json::to_string_pretty(settings)
        .map(|s| format!("{}\n", s))
        .map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let app = match App::from_config(args.config.clone()) {
        Ok(app) => app,
        Err(e) => {
            logging::init(DEFAULT_LOG_FILTER);
            error!(error = %e, "failed to initialize");
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    logging::init(&app.settings.log_filter);
    info!(api = %app.settings.api_base_url, config = app.config_path(), "settings loaded");

    let result = run(&app, args.command).await;
    app.shutdown();

    match result {
        Ok(out) => {
            print!("{}", out);
            ExitCode::SUCCESS
        }
        Err(msg) => {
            eprintln!("Error: {}", msg);
            ExitCode::FAILURE
        }
    }
}

async fn run(app: &App, command: Command) -> Result<String, String> {
    match command {
        Command::Bookmarks { query, summaries } => {
            let mut view = app.bookmarks_view().await.map_err(|e| e.to_string())?;
            if let Some(q) = query {
                view.set_query(q);
            }
            if summaries {
                let ids: Vec<i64> = view.visible().iter().map(|b| b.id).collect();
                let results =
                    futures::future::join_all(ids.iter().map(|id| view.request_summary(*id))).await;
                for (id, result) in ids.iter().zip(results) {
                    if let Err(e) = result {
                        eprintln!("Bookmark #{}: {}", id, e.user_message());
                    }
                }
            }
            Ok(text::render_bookmarks(&view))
        }
        Command::Collections { id, query } => {
            let mut view = app.collections_view(id).await.map_err(|e| e.to_string())?;
            if let Some(q) = query {
                view.set_query(q);
            }
            Ok(text::render_grouped(&view))
        }
        Command::Tags { id, query } => {
            let mut view = app.tags_view(id).await.map_err(|e| e.to_string())?;
            if let Some(q) = query {
                view.set_query(q);
            }
            Ok(text::render_grouped(&view))
        }
        Command::Summary { id, regenerate } => {
            let summary = if regenerate {
                app.summaries().regenerate(id).await
            } else {
                app.summaries().request(id).await
            };
            summary
                .map(|s| format!("{}\n", s))
                .map_err(|e| e.user_message())
        }
        Command::AddBookmark { text: body, title, collection, tags } => {
            let mut new = NewBookmark::new(body);
            new.title = title;
            new.collection_id = collection;
            if !tags.is_empty() {
                new = new.with_tags(tags);
            }
            let bm = app.add_bookmark(new).await.map_err(|e| e.to_string())?;
            Ok(format!("Saved bookmark #{}\n", bm.id))
        }
        Command::AddCollection { name } => {
            let c = app.add_collection(&name).await.map_err(|e| e.to_string())?;
            Ok(format!("Created collection #{} {}\n", c.id, c.name))
        }
        Command::AddTag { name } => {
            let t = app.add_tag(&name).await.map_err(|e| e.to_string())?;
            Ok(format!("Created tag #{} {}\n", t.id, t.name))
        }
        Command::Submit { text: body } => {
            let s = app.submit(&body).await.map_err(|e| e.to_string())?;
            Ok(format!("Saved submission #{}\n", s.id))
        }
        Command::Submissions { summarize } => {
            app.reload_submissions().await.map_err(|e| e.to_string())?;
            if let Some(id) = summarize {
                app.toggle_submission_summary(id)
                    .await
                    .map_err(|e| e.user_message())?;
            }
            app.render_submissions()
                .await
                .ok_or_else(|| "submissions not loaded".to_string())
        }
        Command::Config { action } => {
            let settings = match action {
                ConfigAction::Show => app.stored_settings(),
                ConfigAction::Set { key, value } => app.set_setting(&key, setting_value(&value)),
                ConfigAction::Reset => app.reset_settings(),
            }
            .map_err(|e| e.to_string())?;
            settings_text(&settings)
        }
    }
}
