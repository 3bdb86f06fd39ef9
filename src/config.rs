use std::path::{Path, PathBuf};

use crate::error::{LaunchError, Result};
use crate::properties::Properties;

/// Entry point class (required)
pub const MAIN_CLASS: &str = "app.main.class";
/// Whitespace separated runtime options
pub const VM_OPTIONS: &str = "app.vm.options";
/// Classpath prefix relative to the base directory
pub const CLASS_PATH: &str = "app.class.path";
/// Library directory relative to the base directory
pub const LIBS_DIR: &str = "app.libs.dir";
/// Relay the child's output to our stdout
pub const FOLLOW: &str = "app.follow";

const DEFAULT_LIBS_DIR: &str = "lib";

/// Finds and merges the launch configuration layers
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    search_dir: PathBuf,
    file_name: String,
    override_path: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(search_dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            search_dir: search_dir.into(),
            file_name: file_name.into(),
            override_path: None,
        }
    }

    /// Extra file whose keys take priority over everything found locally
    pub fn with_override(mut self, path: Option<PathBuf>) -> Self {
        self.override_path = path;
        self
    }

    /// Merge `parent`, the local config file and the override file, lowest to highest
    ///
    /// The local file must exist. Read or parse failures of either file are
    /// logged and that layer is skipped.
    pub fn resolve(&self, parent: Properties) -> Result<Properties> {
        let local_path = self.search_dir.join(&self.file_name);
        if !local_path.is_file() {
            return Err(LaunchError::ConfigMissing { path: local_path });
        }

        let mut merged = self.load_local(&local_path, parent);

        if let Some(path) = &self.override_path {
            match load_layer(path) {
                Ok(layer) => {
                    tracing::info!("applying override config {:?}", path);
                    merged.merge(layer);
                }
                Err(err) => tracing::error!("{err}"),
            }
        }

        Ok(merged)
    }

    fn load_local(&self, path: &Path, parent: Properties) -> Properties {
        tracing::debug!("searching {} in {:?}", self.file_name, self.search_dir);
        let mut merged = parent;
        match load_layer(path) {
            Ok(layer) => {
                tracing::info!("found config {:?}", path);
                merged.merge(layer);
            }
            Err(err) => tracing::error!("{err}"),
        }
        merged
    }
}

fn load_layer(path: &Path) -> Result<Properties> {
    Properties::load(path).map_err(|source| LaunchError::ConfigLoad {
        path: path.to_path_buf(),
        source: Box::new(source),
    })
}

/// Launch settings derived from the merged configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Every merged entry, forwarded to the child as system properties
    pub entries: Properties,
    pub main_class: String,
    pub vm_options: Vec<String>,
    pub class_path: String,
    pub libs_dir: String,
    pub follow: bool,
}

impl ResolvedConfig {
    pub fn from_properties(entries: Properties) -> Result<Self> {
        let main_class = entries
            .get(MAIN_CLASS)
            .filter(|s| !s.trim().is_empty())
            .ok_or(LaunchError::RequiredKeyMissing { key: MAIN_CLASS })?
            .to_string();

        let vm_options = entries
            .get(VM_OPTIONS)
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let class_path = entries.get(CLASS_PATH).unwrap_or_default().to_string();
        let libs_dir = entries.get(LIBS_DIR).unwrap_or(DEFAULT_LIBS_DIR).to_string();
        let follow = entries
            .get(FOLLOW)
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"));

        Ok(Self {
            entries,
            main_class,
            vm_options,
            class_path,
            libs_dir,
            follow,
        })
    }
}
