use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::classpath::Classpath;
use crate::config::ResolvedConfig;

/// Prefix of the flag generated for every configuration entry
pub const SYSTEM_PROPERTY_PREFIX: &str = "-D";
/// Flag that introduces the joined classpath
pub const CLASSPATH_FLAG: &str = "-cp";
/// Prefix of the splash image flag
pub const SPLASH_PREFIX: &str = "-splash:";

/// Full argument vector of the child runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: PathBuf,
    args: Vec<OsString>,
}

impl CommandLine {
    /// Assemble the child command line
    ///
    /// Order: runtime options, splash flag, one `-Dkey=value` per config
    /// entry, `-cp <classpath>`, main class, then `trailing` untouched.
    /// Nothing is quoted or escaped.
    pub fn assemble(
        java: &Path,
        config: &ResolvedConfig,
        splash: Option<&Path>,
        classpath: &Classpath,
        trailing: &[OsString],
    ) -> Self {
        let mut args: Vec<OsString> = config.vm_options.iter().map(OsString::from).collect();

        if let Some(splash) = splash {
            let mut flag = OsString::from(SPLASH_PREFIX);
            flag.push(splash.as_os_str());
            args.push(flag);
        }

        args.extend(
            config
                .entries
                .iter()
                .map(|(key, value)| OsString::from(format!("{SYSTEM_PROPERTY_PREFIX}{key}={value}"))),
        );

        args.push(CLASSPATH_FLAG.into());
        args.push(classpath.join());
        args.push(config.main_class.as_str().into());
        args.extend(trailing.iter().cloned());

        Self {
            program: java.to_path_buf(),
            args,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments after the program
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Program followed by its arguments
    pub fn argv(&self) -> impl Iterator<Item = &OsStr> {
        std::iter::once(self.program.as_os_str()).chain(self.args.iter().map(OsString::as_os_str))
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, arg) in self.argv().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}
