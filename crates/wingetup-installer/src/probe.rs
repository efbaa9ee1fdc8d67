use std::env;
use std::ffi::OsString;

use tracing::debug;
use wingetup_core::ToolProbe;

/// Resolves a tool the way the shell would. With `search_path` set, only that
/// `PATH`-style list is searched.
#[derive(Debug, Default, Clone)]
pub struct PathToolProbe {
    search_path: Option<OsString>,
}

impl PathToolProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }
}

impl ToolProbe for PathToolProbe {
    fn is_available(&self, tool: &str) -> bool {
        let resolved = match &self.search_path {
            None => which::which(tool),
            Some(paths) => {
                let cwd = env::current_dir().unwrap_or_default();
                which::which_in(tool, Some(paths), cwd)
            }
        };
        match resolved {
            Ok(path) => {
                debug!(tool, path = %path.display(), "tool resolved");
                true
            }
            Err(err) => {
                debug!(tool, error = %err, "tool not resolvable");
                false
            }
        }
    }
}
