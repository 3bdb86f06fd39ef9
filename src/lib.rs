// Public API
pub mod cli;
pub mod launcher;
pub mod ui;

// Launch pipeline
pub mod classpath;
pub mod command;
pub mod config;
pub mod error;
pub mod follow;
pub mod install;
pub mod process;
pub mod properties;

// Re-export main types
pub use classpath::Classpath;
pub use command::CommandLine;
pub use config::{ConfigResolver, ResolvedConfig};
pub use error::LaunchError;
pub use follow::OutputFollower;
pub use install::{InstallPath, Installation};
pub use launcher::{launch, LaunchPlan, Launched};
pub use process::{ChildProcess, Splash};
pub use properties::Properties;
