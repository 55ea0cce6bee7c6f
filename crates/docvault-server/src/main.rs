//! docvault server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store and a filesystem blob store, and serves the
//! document API over HTTP.
//!
//! # Subcommands
//!
//! ```
//! docvault serve
//! docvault send-expiry-notifications
//! docvault add-user --name "Alice" --email alice@example.com
//! ```
//!
//! `add-user` prompts for the password on stdin and stores its argon2 PHC
//! hash.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use chrono::Utc;
use clap::{Parser, Subcommand};
use docvault_core::{store::DocumentStore, user::NewUser};
use docvault_notify::{LogMailSink, NotificationService};
use docvault_server::{AppState, ServerConfig};
use docvault_storage::FsBlobStore;
use docvault_store_sqlite::SqliteStore;
use rand_core::OsRng;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Docvault document server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Run the HTTP server.
  Serve,

  /// Send the expiry digest email to every user with qualifying documents.
  SendExpiryNotifications,

  /// Create a user account, prompting for the password on stdin.
  AddUser {
    #[arg(long)]
    name:  String,
    #[arg(long)]
    email: String,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("VAULT"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let blob_dir = expand_tilde(&server_cfg.blob_dir);

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  match cli.command {
    Command::Serve => {
      let blobs = FsBlobStore::open(&blob_dir)
        .await
        .with_context(|| format!("failed to open blob dir at {blob_dir:?}"))?;

      let state = AppState {
        store:  Arc::new(store),
        blobs:  Arc::new(blobs),
        config: Arc::new(server_cfg.clone()),
      };

      let app = docvault_server::router(state);
      let address = format!("{}:{}", server_cfg.host, server_cfg.port);

      tracing::info!("Listening on http://{address}");
      let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

      axum::serve(listener, app).await.context("server error")?;
    }

    Command::SendExpiryNotifications => {
      let service =
        NotificationService::new(Arc::new(store), Arc::new(LogMailSink));
      let summary = service
        .run(Utc::now())
        .await
        .context("notification run failed")?;
      println!(
        "Sent {} notification(s) successfully.",
        summary.notified
      );
      if summary.failed > 0 {
        println!("{} notification(s) failed; see the log.", summary.failed);
      }
    }

    Command::AddUser { name, email } => {
      let password = read_password()?;
      let salt = SaltString::generate(&mut OsRng);
      let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
        .to_string();

      let user = store
        .add_user(NewUser {
          name,
          email,
          password_hash: hash,
        })
        .await
        .context("failed to create user")?;
      println!("Created user {} <{}>", user.name, user.email);
    }
  }

  Ok(())
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
