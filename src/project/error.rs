use std::path::PathBuf;

/// Failure to bring unit files into a host.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8", .0.display())]
    InvalidUtf8(PathBuf),

    #[error("unsupported file extension: {}", .0.display())]
    UnsupportedExtension(PathBuf),

    #[error("failed to load {} file(s):\n  {}", .0.len(), join_errors(.0))]
    Multiple(Vec<LoadError>),
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }

    /// Number of individual failures this error stands for.
    pub fn count(&self) -> usize {
        match self {
            LoadError::Multiple(errors) => errors.iter().map(LoadError::count).sum(),
            _ => 1,
        }
    }
}

fn join_errors(errors: &[LoadError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n  ")
}
