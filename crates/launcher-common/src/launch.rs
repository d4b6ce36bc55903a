use std::fmt;
use std::process::{Command, Stdio};

use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl LaunchCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl fmt::Display for LaunchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&shell_quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(arg))?;
        }
        Ok(())
    }
}

/// Fire-and-forget process launch. Implementations never report failure to
/// the caller.
pub trait Spawner {
    fn spawn_detached(&self, command: &LaunchCommand);
}

/// Spawns with null stdio in a new process group and drops the child
/// handle, so rofi neither waits on the editor nor holds its pipes open.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedSpawner;

impl Spawner for DetachedSpawner {
    fn spawn_detached(&self, command: &LaunchCommand) {
        let mut process = Command::new(&command.program);
        process
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            process.process_group(0);
        }

        match process.spawn() {
            Ok(child) => debug!(pid = child.id(), %command, "launched editor"),
            Err(error) => debug!(%command, %error, "editor launch failed"),
        }
    }
}

/// Prints the command instead of running it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunSpawner;

impl Spawner for DryRunSpawner {
    fn spawn_detached(&self, command: &LaunchCommand) {
        debug!(%command, "dry run, not launching");
    }
}

fn shell_quote(raw: &str) -> String {
    let safe = !raw.is_empty()
        && raw
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || "-_./=:@+,%~".contains(ch));
    if safe {
        raw.to_string()
    } else {
        format!("'{}'", raw.replace('\'', "'\\''"))
    }
}
