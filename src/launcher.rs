use anyhow::Context;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::classpath::Classpath;
use crate::cli::Cli;
use crate::command::CommandLine;
use crate::config::{ConfigResolver, ResolvedConfig};
use crate::error::Result;
use crate::follow::OutputFollower;
use crate::install::{InstallPath, Installation, CONFIG_FILE_NAME};
use crate::process::{self, ChildProcess, Splash};
use crate::properties::Properties;

/// Everything needed to start the child, computed without side effects
#[derive(Debug, Clone)]
pub struct LaunchPlan {
    pub config: ResolvedConfig,
    pub command: CommandLine,
}

impl LaunchPlan {
    /// Resolve configuration, build the classpath and assemble the command line
    pub fn prepare(
        install: &Installation,
        override_path: Option<PathBuf>,
        trailing: &[OsString],
    ) -> Result<Self> {
        let java = install.java_executable();
        tracing::info!("using java {:?}", java);
        tracing::info!("appstart dir: {:?}", install.base_dir());

        let props = ConfigResolver::new(install.path(InstallPath::Root), CONFIG_FILE_NAME)
            .with_override(override_path)
            .resolve(Properties::new())?;
        let config = ResolvedConfig::from_properties(props)?;
        tracing::info!("vm options = {:?}", config.vm_options);
        tracing::info!("main class = {}", config.main_class);

        let classpath = Classpath::build(install.base_dir(), &config.class_path, &config.libs_dir);

        let splash = install.splash_file();
        if let Some(splash) = &splash {
            tracing::info!("splash file: {:?}", splash);
        }

        let command =
            CommandLine::assemble(&java, &config, splash.as_deref(), &classpath, trailing);
        tracing::info!("command line:\n{command}");

        Ok(Self { config, command })
    }
}

/// A started application
#[derive(Debug)]
pub struct Launched {
    pub child: ChildProcess,
    /// Present only when `app.follow` is set
    pub follower: Option<OutputFollower>,
}

/// Prepare and spawn the application, starting the output relay if configured
///
/// Returns as soon as the child exists. Nothing is spawned when preparation fails.
pub fn launch(
    install: &Installation,
    override_path: Option<PathBuf>,
    trailing: &[OsString],
    splash: Option<&mut dyn Splash>,
) -> Result<Launched> {
    let plan = LaunchPlan::prepare(install, override_path, trailing)?;
    let mut child = process::spawn(&plan.command, splash)?;

    // Without a follower the read end stays with the child handle so the
    // application never writes into a closed pipe while we are alive
    let follower = if plan.config.follow {
        child.take_output().map(OutputFollower::start).transpose()?
    } else {
        None
    };

    Ok(Launched { child, follower })
}

/// Run the launcher for a parsed command line
///
/// Blocks only while relaying output; the child is left running on return.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let install = Installation::discover(cli.home.clone(), cli.java_home.clone())
        .context("Failed to locate the application directory")?;
    let override_path = cli.override_path();

    let launched = launch(&install, override_path, &cli.args, None)?;
    tracing::debug!("launched child {}", launched.child.id());

    if let Some(follower) = launched.follower {
        // Relay failures are already logged and never change the exit status
        if let Ok(total) = follower.join() {
            tracing::debug!("relayed {total} bytes");
        }
    }

    Ok(())
}
