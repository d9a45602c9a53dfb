use anyhow::{Context, Result};
use blog_client::Session;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_FILE: &str = ".blog_session.json";

/// Session persisted between CLI runs.
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(custom_path: Option<PathBuf>) -> Result<Self> {
        let path = match custom_path {
            Some(path) => path,
            None => {
                let home = dirs::home_dir().context("Failed to get home directory")?;
                home.join(DEFAULT_FILE)
            }
        };

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<Session>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(None),
            Ok(raw) => {
                let session = serde_json::from_str(&raw)
                    .with_context(|| format!("Corrupt session file {:?}", self.path))?;
                tracing::debug!("Session loaded from {:?}", self.path);
                Ok(Some(session))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).context("Failed to read session file"),
        }
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        let raw = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("Failed to save session to {:?}", self.path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&self.path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.path, perms)?;
        }

        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove session file {:?}", self.path))?;
        }
        Ok(())
    }

    /// Writes whatever the client currently holds.
    pub fn sync(&self, session: Option<&Session>) -> Result<()> {
        match session {
            Some(session) => self.save(session),
            None => self.clear(),
        }
    }
}
