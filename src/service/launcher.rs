use crate::models::config::Config;
use crate::models::error::{AdminError, Result};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread;
use uuid::Uuid;

/// Identifies one launched backup job. Nothing is tracked through it yet;
/// callers are free to drop it.
#[derive(Debug, Clone)]
pub struct JobHandle {
    pub id: Uuid,
    pub pid: Option<u32>,
    pub started_at: DateTime<Utc>,
}

/// Starts a backup job that outlives the request that triggered it.
pub trait JobLauncher: Send + Sync {
    fn launch(&self) -> Result<JobHandle>;
}

/// Runs `<interpreter> <script>` as a detached child process.
pub struct ProcessLauncher {
    interpreter: String,
    script: String,
    working_directory: Option<PathBuf>,
}

impl ProcessLauncher {
    pub fn new(interpreter: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
            script: script.into(),
            working_directory: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let launcher = Self::new(&config.interpreter, &config.backup_script);
        match &config.working_directory {
            Some(dir) => launcher.with_working_directory(dir),
            None => launcher,
        }
    }

    pub fn with_working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(dir.into());
        self
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.interpreter);
        command
            .arg(&self.script)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        if let Some(dir) = &self.working_directory {
            command.current_dir(dir);
        }

        // Own process group: a Ctrl+C on the server must not reach the job.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        command
    }
}

impl JobLauncher for ProcessLauncher {
    fn launch(&self) -> Result<JobHandle> {
        let child = self
            .command()
            .spawn()
            .map_err(|cause| AdminError::JobLaunch {
                program: format!("{} {}", self.interpreter, self.script),
                cause,
            })?;

        let handle = JobHandle {
            id: Uuid::new_v4(),
            pid: Some(child.id()),
            started_at: Utc::now(),
        };
        debug!(
            "Started backup job {} ({} {}, pid {})",
            handle.id,
            self.interpreter,
            self.script,
            child.id()
        );

        let reaper = thread::Builder::new().name(format!("backup-job-{}", handle.id));
        reap_in_background(reaper, child, handle.id);

        Ok(handle)
    }
}

/// Waits for the child on its own thread so it never lingers as a zombie.
/// The job is already running, so failing to start the thread is only
/// logged. Returns whether the thread started.
fn reap_in_background(reaper: thread::Builder, mut child: Child, job_id: Uuid) -> bool {
    let spawned = reaper.spawn(move || match child.wait() {
        Ok(status) => debug!("Backup job {} exited with {}", job_id, status),
        Err(e) => warn!("Failed to wait for backup job {}: {}", job_id, e),
    });

    match spawned {
        Ok(_) => true,
        Err(e) => {
            warn!(
                "Backup job {} is running but could not be watched: {}",
                job_id, e
            );
            false
        }
    }
}
