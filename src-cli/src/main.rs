mod host;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use giftcat::store::{keys, load_draft};
use giftcat::{
    load_config, render_not_found_page, render_share_page, BackendClient, CatalogId,
    CatalogInput, Config, DraftStore, GiftcatError, ItemsInput, MemoryDraftStore, PollPolicy,
    PollingCoordinator, PreconditionError, ShareError, SqliteDraftStore, StoreError,
    TokioSleeper,
};

use host::TerminalHost;

#[derive(Parser)]
#[command(name = "giftcat")]
#[command(about = "Gift catalog draft flow: submit items, poll OGP status, render share pages")]
#[command(version)]
struct Cli {
    /// JSON config file. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL. Overrides GIFTCAT_BASE_URL and the config file.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Session store location. Overrides the config file.
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit the item form and record the session inputs.
    Submit {
        #[arg(long)]
        catalog_id: String,
        #[arg(long)]
        url_count: u8,
        #[arg(long)]
        title1: String,
        #[arg(long)]
        url1: String,
        #[arg(long)]
        title2: Option<String>,
        #[arg(long)]
        url2: Option<String>,
        #[arg(long)]
        title3: Option<String>,
        #[arg(long)]
        url3: Option<String>,
    },
    /// Ask the backend to start OGP generation for a submitted catalog.
    StartCheck {
        /// Catalog id; falls back to the stored one.
        #[arg(long)]
        id: Option<String>,
    },
    /// Poll OGP status until the catalog is ready, then write the draft.
    Poll {
        /// Catalog id; falls back to the stored one.
        #[arg(long)]
        id: Option<String>,
        /// Wait for Enter after each notice.
        #[arg(long, default_value_t = false)]
        confirm_notices: bool,
    },
    /// Publish a catalog from a JSON file and print its share URL.
    Publish {
        /// Catalog JSON: `title`, optional `message`, and exactly three `items`.
        file: PathBuf,
    },
    /// Render the share page for a published catalog.
    Share {
        share_id: String,
        /// Write the page here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the stored draft as JSON.
    Draft,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_tracing(cli.json_logs) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "giftcat failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> giftcat::Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Submit {
            catalog_id,
            url_count,
            title1,
            url1,
            title2,
            url2,
            title3,
            url3,
        } => {
            let input = ItemsInput {
                catalog_id,
                url_count,
                title1,
                url1,
                title2,
                url2,
                title3,
                url3,
            };
            let client = backend(&config, cli.base_url.as_deref())?;
            let store = open_store(&config, cli.store)?;

            let receipt = client.submit_items(&input, &store).await?;
            println!("{}", receipt.catalog_id);
            Ok(ExitCode::SUCCESS)
        }

        Commands::StartCheck { id } => {
            let catalog_id = match id.as_deref().and_then(CatalogId::parse) {
                Some(id) => id,
                None => open_store(&config, cli.store)?
                    .get(keys::CATALOG_ID)?
                    .as_deref()
                    .and_then(CatalogId::parse)
                    .ok_or(PreconditionError::MissingCatalogId)?,
            };

            let client = backend(&config, cli.base_url.as_deref())?;
            let reply = client.start_status_check(&catalog_id).await?;
            println!("{}", reply);
            Ok(ExitCode::SUCCESS)
        }

        Commands::Poll {
            id,
            confirm_notices,
        } => {
            let client = Arc::new(backend(&config, cli.base_url.as_deref())?);
            let (store, opened) = session_store(&config, cli.store);
            let host = Arc::new(TerminalHost::new(confirm_notices));

            let coordinator = PollingCoordinator::new(
                client.clone(),
                client,
                store,
                Arc::new(TokioSleeper),
                host.clone(),
                host,
            )
            .with_policy(PollPolicy::from_config(&config.polling));

            let outcome = match opened {
                Ok(()) => coordinator.run_from_query(id.as_deref()).await,
                Err(e) => coordinator.run(Err(e)).await,
            };
            info!(reason = %outcome.reason, attempts = outcome.attempts, "Poll finished");

            Ok(if outcome.reason.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }

        Commands::Publish { file } => {
            let raw = std::fs::read_to_string(&file).map_err(|e| GiftcatError::Io {
                path: file.clone(),
                source: e,
            })?;
            let catalog: CatalogInput =
                serde_json::from_str(&raw).map_err(|e| ShareError::Invalid {
                    field: "catalog".to_string(),
                    reason: e.to_string(),
                })?;

            let client = backend(&config, cli.base_url.as_deref())?;
            let receipt = client.publish_catalog(&catalog).await?;
            println!("{}", receipt.share_url);
            Ok(ExitCode::SUCCESS)
        }

        Commands::Share { share_id, output } => {
            let client = backend(&config, cli.base_url.as_deref())?;

            let (page, code) = match client.fetch_shared_catalog(&share_id).await {
                Ok(catalog) => (render_share_page(&catalog), ExitCode::SUCCESS),
                Err(ShareError::NotFound(_)) => (render_not_found_page(), ExitCode::FAILURE),
                Err(e) => return Err(e.into()),
            };

            match output {
                Some(path) => std::fs::write(&path, page).map_err(|e| GiftcatError::Io {
                    path: path.clone(),
                    source: e,
                })?,
                None => print!("{}", page),
            }
            Ok(code)
        }

        Commands::Draft => {
            let store = open_store(&config, cli.store)?;
            match load_draft(&store)? {
                Some(draft) => {
                    if let Some(updated_at) = store.updated_at(keys::DRAFT)? {
                        info!(updated_at = %updated_at, "Draft loaded");
                    }
                    let json = serde_json::to_string_pretty(&draft).map_err(StoreError::Encode)?;
                    println!("{}", json);
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    eprintln!("No draft stored");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

fn backend(config: &Config, base_url: Option<&str>) -> giftcat::Result<BackendClient> {
    let base_url = config.resolve_base_url(base_url)?;
    Ok(BackendClient::new(&base_url, &config.http)?)
}

/// Opens the session store for a polling session. A store that cannot be opened
/// still yields a session, which then fails its preconditions and sends the user
/// back to the create page.
fn session_store(
    config: &Config,
    override_path: Option<PathBuf>,
) -> (Arc<dyn DraftStore>, Result<(), PreconditionError>) {
    match open_store(config, override_path) {
        Ok(store) => {
            let store: Arc<dyn DraftStore> = Arc::new(store);
            (store, Ok(()))
        }
        Err(e) => {
            warn!(error = %e, "Session store unavailable");
            let store: Arc<dyn DraftStore> = Arc::new(MemoryDraftStore::new());
            (store, Err(PreconditionError::StoreUnavailable(e.to_string())))
        }
    }
}

fn open_store(config: &Config, override_path: Option<PathBuf>) -> giftcat::Result<SqliteDraftStore> {
    let path = override_path
        .or_else(|| config.store_path())
        .ok_or_else(|| StoreError::Io {
            path: PathBuf::from("~/.giftcat/data/session.db"),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "home directory unavailable; pass --store",
            ),
        })?;

    Ok(SqliteDraftStore::open(&path)?)
}
