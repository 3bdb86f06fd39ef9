use std::io;
use std::path::PathBuf;

/// Errors raised while turning `appstart.properties` into a running child
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("Missing config file {}", path.display())]
    ConfigMissing { path: PathBuf },

    #[error("Cannot load appstart config in {}: {source}", path.display())]
    ConfigLoad {
        path: PathBuf,
        #[source]
        source: Box<LaunchError>,
    },

    #[error("Malformed properties at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Missing config entry {key}")]
    RequiredKeyMissing { key: &'static str },

    #[error("Failed to spawn '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to relay child output")]
    Relay(#[source] io::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T, E = LaunchError> = std::result::Result<T, E>;
