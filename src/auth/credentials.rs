use std::path::PathBuf;

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("KRONK_INSTANCE_URL is not a valid URL: {0}")]
    InstanceUrl(#[from] url::ParseError),
}

/// Credentials and instance override read from the environment.
#[derive(Debug, Clone, Default)]
pub struct CredentialSet {
    /// OAuth access token issued by the instance. Absent means read-only.
    pub access_token: Option<String>,
    /// Overrides `instance_url` from the config file when set.
    pub instance_url: Option<Url>,
}

impl CredentialSet {
    pub fn signed_in(&self) -> bool {
        self.access_token.is_some()
    }
}

/// Return candidate .env paths in priority order.
fn env_file_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config/kronktui/.env"));
    }
    paths.push(PathBuf::from(".env"));
    paths
}

/// Load .env files into the process environment.
///
/// Earlier files win because dotenvy never overwrites existing variables.
pub fn load_env_files() {
    for path in env_file_paths() {
        if path.exists()
            && let Err(e) = dotenvy::from_path(&path)
        {
            tracing::warn!(path = %path.display(), "ignoring unreadable .env file: {e}");
        }
    }
}

/// Load credentials from environment variables, trying .env files first.
pub fn load_credentials() -> Result<CredentialSet, CredentialError> {
    load_env_files();
    let get = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
    credentials_from(get("KRONK_ACCESS_TOKEN"), get("KRONK_INSTANCE_URL"))
}

fn credentials_from(
    access_token: Option<String>,
    instance_url: Option<String>,
) -> Result<CredentialSet, CredentialError> {
    let instance_url = instance_url.as_deref().map(Url::parse).transpose()?;
    Ok(CredentialSet {
        access_token,
        instance_url,
    })
}
