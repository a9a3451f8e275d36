use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, error, info};

use crate::error::ExternalCommandError;
use crate::stages::CommandSpec;

#[derive(Debug, Clone, Default)]
pub struct RunnerOptions {
    /// Log the command and skip execution.
    pub fake: bool,
    /// Command stdout and stderr are appended here when set.
    pub output_log: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RunOutcome {
    Executed,
    Faked,
}

/// Runs one command to completion without a shell. Non-zero exit is an error.
pub fn run_command(
    spec: &CommandSpec,
    options: &RunnerOptions,
) -> Result<RunOutcome, ExternalCommandError> {
    let rendered = spec.render();
    info!(command = %rendered, fake = options.fake, "running stage command");
    if options.fake {
        return Ok(RunOutcome::Faked);
    }

    let mut command = Command::new(&spec.program);
    command.args(&spec.args);

    if let Some(path) = &options.output_log {
        let output_log_error = |source| ExternalCommandError::OutputLog {
            path: path.clone(),
            source,
        };
        let stdout = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(output_log_error)?;
        let stderr = stdout.try_clone().map_err(output_log_error)?;
        debug!(path = %path.display(), "appending command output");
        command.stdout(Stdio::from(stdout)).stderr(Stdio::from(stderr));
    }

    let status = command
        .status()
        .map_err(|source| ExternalCommandError::Spawn {
            command: rendered.clone(),
            source,
        })?;

    if !status.success() {
        error!(command = %rendered, %status, "command failed");
        return Err(ExternalCommandError::Failed {
            command: rendered,
            status,
        });
    }

    Ok(RunOutcome::Executed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(program: &str, args: &[&str]) -> CommandSpec {
        CommandSpec {
            program: program.to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    #[test]
    fn fake_mode_never_spawns() {
        let options = RunnerOptions {
            fake: true,
            output_log: None,
        };
        let outcome = run_command(&spec("beagle_program_that_does_not_exist", &[]), &options);

        assert_eq!(outcome.unwrap(), RunOutcome::Faked);
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let err = run_command(
            &spec("beagle_program_that_does_not_exist", &["--keyname", "s001"]),
            &RunnerOptions::default(),
        )
        .unwrap_err();

        match err {
            ExternalCommandError::Spawn { command, .. } => {
                assert_eq!(command, "beagle_program_that_does_not_exist --keyname s001");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn output_is_appended_to_the_log() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("commands.log");
        std::fs::write(&log, "previous\n").unwrap();
        let options = RunnerOptions {
            fake: false,
            output_log: Some(log.clone()),
        };

        run_command(&spec("echo", &["hello"]), &options).unwrap();

        assert_eq!(std::fs::read_to_string(&log).unwrap(), "previous\nhello\n");
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_reported_with_the_command() {
        let err = run_command(&spec("false", &[]), &RunnerOptions::default()).unwrap_err();

        assert!(matches!(err, ExternalCommandError::Failed { ref command, .. } if command == "false"));
    }
}
