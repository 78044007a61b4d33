//! The `placement login` command.

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};

use placement_client::config::load_config_from;
use placement_client::{ApiClient, SessionStore, StoredSession};

pub async fn execute(
    username: String,
    password: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let password = match password {
        Some(p) => p,
        None => {
            eprintln!("Password for {username}:");
            let mut line = String::new();
            std::io::stdin()
                .lock()
                .read_line(&mut line)
                .context("failed to read password from stdin")?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };
    anyhow::ensure!(!password.is_empty(), "password must not be empty");

    let client = ApiClient::from_config(&config.api)?;
    let credentials = client.login(&username, &password).await?;

    let store = SessionStore::default_location();
    store.save(&StoredSession {
        base_url: config.api.base_url.clone(),
        username: username.clone(),
        credentials,
    })?;

    println!("Logged in to {} as {username}", config.api.base_url);
    tracing::debug!(path = %store.path().display(), "session saved");
    Ok(())
}
