use std::path::PathBuf;

/// Failure while building a shader program.
///
/// All variants are recoverable: the manager reports them and keeps the
/// previously active program.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    /// The stage source could not be read.
    #[error("failed to read shader `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stage failed to parse or validate.
    #[error("failed to compile shader `{}`:\n{log}", path.display())]
    Compile { path: PathBuf, log: String },

    /// The stages compiled but do not form a valid program.
    #[error("failed to link shader program:\n{log}")]
    Link { log: String },
}

impl ShaderError {
    /// Path of the failing stage, when the failure belongs to a single stage.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            ShaderError::Io { path, .. } | ShaderError::Compile { path, .. } => Some(path),
            ShaderError::Link { .. } => None,
        }
    }
}
