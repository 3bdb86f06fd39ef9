use std::io::{self, PipeReader};
use std::process::{Child, Command, Stdio};

use crate::command::CommandLine;
use crate::error::{LaunchError, Result};

/// Startup indicator shown while the child is being created
pub trait Splash {
    fn close(&mut self);
}

/// A spawned child whose stderr is merged into its stdout
///
/// Dropping this neither waits for nor kills the child.
#[derive(Debug)]
pub struct ChildProcess {
    child: Child,
    output: Option<PipeReader>,
}

impl ChildProcess {
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Take the read end of the combined output stream
    ///
    /// Returns `None` once it has been taken.
    pub fn take_output(&mut self) -> Option<PipeReader> {
        self.output.take()
    }
}

/// Spawn `command` with stderr redirected into stdout
///
/// `splash` is closed once the child exists; it stays open if spawning fails.
pub fn spawn(command: &CommandLine, splash: Option<&mut dyn Splash>) -> Result<ChildProcess> {
    let (reader, writer) = io::pipe()?;

    let child = {
        let mut cmd = Command::new(command.program());
        cmd.args(command.args())
            .stdin(Stdio::inherit())
            .stdout(writer.try_clone()?)
            .stderr(writer);

        // `cmd` holds our write ends; dropping it here lets the reader see EOF
        cmd.spawn().map_err(|source| LaunchError::Spawn {
            program: command.program().to_string_lossy().into_owned(),
            source,
        })?
    };
    tracing::info!("started child process {}", child.id());

    if let Some(splash) = splash {
        splash.close();
    }

    Ok(ChildProcess {
        child,
        output: Some(reader),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classpath::Classpath;
    use crate::config::ResolvedConfig;
    use crate::properties::Properties;
    use serial_test::serial;
    use std::ffi::OsString;
    use std::io::Read;
    use std::path::Path;

    #[derive(Default)]
    struct RecordingSplash {
        closed: usize,
    }

    impl Splash for RecordingSplash {
        fn close(&mut self) {
            self.closed += 1;
        }
    }

    fn command_for(program: &str) -> CommandLine {
        let props: Properties = [("app.main.class", "m.Main")].into_iter().collect();
        let config = ResolvedConfig::from_properties(props).unwrap();
        CommandLine::assemble(
            Path::new(program),
            &config,
            None,
            &Classpath::default(),
            &[OsString::from("arg")],
        )
    }

    #[test]
    #[serial]
    fn test_spawn_missing_program_fails_and_keeps_splash() {
        let command = command_for("/definitely/not/here/java");
        let mut splash = RecordingSplash::default();

        let err = spawn(&command, Some(&mut splash)).unwrap_err();
        match err {
            LaunchError::Spawn { program, .. } => {
                assert_eq!(program, "/definitely/not/here/java")
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(splash.closed, 0);
    }

    /// `sh -c <script>` where the remaining java-style arguments become
    /// positional parameters the script ignores
    #[cfg(unix)]
    fn shell_command(script: &str) -> CommandLine {
        let props: Properties = [("app.main.class", "m.Main")].into_iter().collect();
        let mut config = ResolvedConfig::from_properties(props).unwrap();
        config.vm_options = vec!["-c".to_string(), script.to_string()];
        CommandLine::assemble(
            Path::new("/bin/sh"),
            &config,
            None,
            &Classpath::default(),
            &[],
        )
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_spawn_closes_splash_and_merges_stderr() {
        let mut splash = RecordingSplash::default();
        let mut child = spawn(
            &shell_command("echo out; echo err 1>&2"),
            Some(&mut splash),
        )
        .unwrap();
        assert_eq!(splash.closed, 1);
        assert!(child.id() > 0);

        let mut output = String::new();
        child
            .take_output()
            .unwrap()
            .read_to_string(&mut output)
            .unwrap();
        assert!(output.contains("out\n"));
        assert!(output.contains("err\n"));
        assert!(child.take_output().is_none());
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_spawn_without_splash() {
        let mut child = spawn(&shell_command("printf done"), None).unwrap();

        let mut output = String::new();
        child
            .take_output()
            .unwrap()
            .read_to_string(&mut output)
            .unwrap();
        assert_eq!(output, "done");
    }
}
