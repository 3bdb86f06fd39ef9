use clap::builder::FalseyValueParser;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Application launcher - start a JVM application described by appstart.properties
///
/// appstart reads `appstart.properties` from its base directory, builds the
/// classpath from the library directory and starts the runtime with every
/// configured property. All arguments are passed through to the application.
///
/// Launcher settings come from the environment so that no application
/// argument is ever mistaken for a launcher flag.
#[derive(Parser, Debug)]
#[command(
    name = "appstart",
    version,
    about,
    long_about = None,
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// Log launcher progress
    #[arg(
        long = "appstart-verbose",
        env = "APPSTART_VERBOSE",
        value_parser = FalseyValueParser::new(),
        hide = true
    )]
    pub verbose: bool,

    /// Extra properties file applied over appstart.properties
    #[arg(
        long = "appstart-properties",
        env = "APPSTART_PROPERTIES",
        value_name = "FILE",
        hide = true
    )]
    pub properties: Option<String>,

    /// Base directory (defaults to the directory holding the launcher)
    #[arg(long = "appstart-home", env = "APPSTART_HOME", value_name = "DIR", hide = true)]
    pub home: Option<PathBuf>,

    /// Runtime home; `java` is looked up on PATH when unset
    #[arg(long = "appstart-java-home", env = "JAVA_HOME", value_name = "DIR", hide = true)]
    pub java_home: Option<PathBuf>,

    /// Arguments forwarded to the application
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        num_args = 0..
    )]
    pub args: Vec<OsString>,
}

impl Cli {
    /// Override file with `~` and `$VAR` expanded
    pub fn override_path(&self) -> Option<PathBuf> {
        let raw = self.properties.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        let expanded = shellexpand::full(raw)
            .map(|s| s.into_owned())
            .unwrap_or_else(|err| {
                tracing::warn!("cannot expand {raw:?}: {err}");
                raw.to_string()
            });
        Some(PathBuf::from(expanded))
    }
}
