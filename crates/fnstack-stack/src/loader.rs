//! Loading stack definitions from local files or remote URLs.

use std::path::Path;
use std::time::Duration;

use fnstack_common::constants::DEFAULT_TIMEOUT_SECS;
use fnstack_common::error::{FnstackError, Result};

use crate::definition::StackDefinition;

/// Source of stack definitions.
///
/// The engine depends only on this contract, so tests can hand it an
/// in-memory stack.
pub trait StackLoader: Send + Sync {
    /// Loads the stack at `location`, a filesystem path or URL.
    ///
    /// # Errors
    ///
    /// Returns [`FnstackError::Fetch`] if the stack cannot be retrieved and
    /// [`FnstackError::Parse`] if its content is malformed.
    fn load(&self, location: &str) -> Result<StackDefinition>;
}

/// Loads YAML stacks from local paths, or over HTTP(S) when the location
/// starts with `http://` or `https://`.
#[derive(Debug, Clone)]
pub struct FileOrUrlLoader {
    timeout: Duration,
}

impl FileOrUrlLoader {
    /// Creates a loader with the default fetch timeout.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Sets the timeout applied to remote fetches.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn read_local(location: &str) -> Result<String> {
        let path = Path::new(location);
        tracing::info!(path = %path.display(), "reading stack file");
        std::fs::read_to_string(path).map_err(|e| FnstackError::Fetch {
            location: location.to_string(),
            message: e.to_string(),
        })
    }

    fn fetch_remote(&self, url: &str) -> Result<String> {
        tracing::info!(url, "fetching remote stack file");
        let fetch_err = |message: String| FnstackError::Fetch {
            location: url.to_string(),
            message,
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| fetch_err(e.to_string()))?;
        let response = client.get(url).send().map_err(|e| fetch_err(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_err(format!("HTTP {status}")));
        }
        response.text().map_err(|e| fetch_err(e.to_string()))
    }
}

impl Default for FileOrUrlLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl StackLoader for FileOrUrlLoader {
    fn load(&self, location: &str) -> Result<StackDefinition> {
        let content = if is_remote(location) {
            self.fetch_remote(location)?
        } else {
            Self::read_local(location)?
        };
        StackDefinition::from_yaml(&content, location)
    }
}

/// Returns whether `location` names a remote stack.
#[must_use]
pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}
