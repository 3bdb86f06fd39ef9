use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Name of the launch configuration file looked up in the base directory
pub const CONFIG_FILE_NAME: &str = "appstart.properties";

/// Splash image handed to the runtime when present
pub const SPLASH_FILE_NAME: &str = "splash.img";

/// Installation path types
#[derive(Debug, Clone, Copy)]
pub enum InstallPath {
    /// Base directory: $APPSTART_HOME or the directory holding the launcher
    Root,
    /// Splash image: base/splash.img
    Splash,
}

/// Installation - where the launcher lives and which runtime it starts
#[derive(Debug, Clone)]
pub struct Installation {
    /// Absolute base directory of the application
    base_dir: PathBuf,
    /// Runtime home ($JAVA_HOME); `None` means resolve `java` from PATH
    java_home: Option<PathBuf>,
}

impl Installation {
    /// Create an installation rooted at `base_dir`
    pub fn new(base_dir: impl AsRef<Path>, java_home: Option<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let base_dir = std::path::absolute(base_dir)
            .with_context(|| format!("Failed to resolve base directory {:?}", base_dir))?;

        Ok(Self {
            base_dir,
            java_home,
        })
    }

    /// Locate the installation
    ///
    /// Uses `home` when given, otherwise the directory that contains the
    /// running launcher executable.
    pub fn discover(home: Option<PathBuf>, java_home: Option<PathBuf>) -> Result<Self> {
        let base_dir = match home {
            Some(home) => home,
            None => Self::launcher_dir()?,
        };
        Self::new(base_dir, java_home)
    }

    fn launcher_dir() -> Result<PathBuf> {
        let exe = env::current_exe().context("Failed to locate the launcher executable")?;
        exe.parent()
            .map(Path::to_path_buf)
            .with_context(|| format!("Launcher executable {:?} has no parent directory", exe))
    }

    /// Get path for a specific installation location
    pub fn path(&self, path_type: InstallPath) -> PathBuf {
        match path_type {
            InstallPath::Root => self.base_dir.clone(),
            InstallPath::Splash => self.base_dir.join(SPLASH_FILE_NAME),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Runtime executable: `<java_home>/bin/java`, or bare `java` for a PATH lookup
    pub fn java_executable(&self) -> PathBuf {
        let name = format!("java{}", env::consts::EXE_SUFFIX);
        match &self.java_home {
            Some(home) => home.join("bin").join(name),
            None => PathBuf::from(name),
        }
    }

    /// Splash image path, only if the file exists
    pub fn splash_file(&self) -> Option<PathBuf> {
        let splash = self.path(InstallPath::Splash);
        splash.is_file().then_some(splash)
    }
}
