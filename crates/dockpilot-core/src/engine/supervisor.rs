use super::descriptor::JobDescriptor;
use super::error::EngineError;
use super::log_tail;
use super::workspace::Workspace;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use fs4::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// The external docking program and the arguments placed before the descriptor path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineCommand {
    pub program: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
}

impl EngineCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

/// What a caller learns about a workspace's run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Running { log: String },
    Completed { log: String, results_path: PathBuf },
    /// `exit_code` is `None` when the engine was killed by a signal.
    Failed { log: String, exit_code: Option<i32> },
    NotFound,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed { .. } | JobStatus::Failed { .. })
    }

    pub fn log(&self) -> Option<&str> {
        match self {
            JobStatus::Running { log }
            | JobStatus::Completed { log, .. }
            | JobStatus::Failed { log, .. } => Some(log),
            JobStatus::NotFound => None,
        }
    }
}

/// Receipt returned by a successful [`JobSupervisor::start`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobTicket {
    pub workspace: String,
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub pid: u32,
    pub descriptor_path: PathBuf,
    pub log_path: PathBuf,
}

/// A launched run. Owns the child process and the workspace's run lock until the run's
/// outcome is reported.
#[derive(Debug)]
struct JobHandle {
    workspace: String,
    run_id: Uuid,
    started_at: DateTime<Utc>,
    child: Child,
    log_path: PathBuf,
    results_dir: PathBuf,
    _run_lock: File,
}

impl JobHandle {
    /// Non-blocking exit check.
    fn try_status(&mut self) -> Result<Option<ExitStatus>, EngineError> {
        self.child.try_wait().map_err(EngineError::io(&self.log_path))
    }

    /// Builds the terminal status and releases the run lock.
    fn into_outcome(self, status: ExitStatus) -> JobStatus {
        let log = log_tail::read(&self.log_path).unwrap_or_else(|err| {
            warn!(workspace = %self.workspace, error = %err, "Could not read the run log");
            String::new()
        });
        let elapsed = Utc::now() - self.started_at;
        if status.success() {
            info!(
                workspace = %self.workspace,
                run_id = %self.run_id,
                elapsed_s = elapsed.num_seconds(),
                "Docking run completed"
            );
            JobStatus::Completed {
                log,
                results_path: self.results_dir,
            }
        } else {
            warn!(
                workspace = %self.workspace,
                run_id = %self.run_id,
                exit_code = ?status.code(),
                "Docking run failed"
            );
            JobStatus::Failed {
                log,
                exit_code: status.code(),
            }
        }
    }
}

/// Registry entry. `Starting` holds the workspace's claim while the engine is launched.
#[derive(Debug)]
enum Slot {
    Starting { log_path: PathBuf },
    Running(JobHandle),
}

impl Slot {
    fn log_path(&self) -> &Path {
        match self {
            Slot::Starting { log_path } => log_path,
            Slot::Running(handle) => &handle.log_path,
        }
    }
}

enum Observation {
    Running(PathBuf),
    Exited(JobHandle, ExitStatus),
}

/// Runs at most one docking engine process per workspace and reports each run's
/// outcome exactly once.
///
/// Runs are tracked in a sharded concurrent map keyed by workspace. A run's entry is
/// claimed before its process is spawned and removed only when a terminal status is
/// handed to a caller, so concurrent `start` calls for one workspace cannot both
/// launch, and concurrent `poll` calls cannot both observe completion. Filesystem and
/// process work happens after the map's shard lock is released.
///
/// A run also holds an exclusive lock on the workspace's run lock file, which keeps
/// supervisors in other processes from starting the same workspace.
///
/// Dropping the supervisor does not kill running engines.
#[derive(Debug)]
pub struct JobSupervisor {
    engine: EngineCommand,
    jobs: DashMap<String, Slot>,
}

impl JobSupervisor {
    pub fn new(engine: EngineCommand) -> Self {
        Self {
            engine,
            jobs: DashMap::new(),
        }
    }

    /// Persists `descriptor` and launches the engine for `workspace`.
    ///
    /// The descriptor is written to the workspace's `config.json`, the run log is
    /// truncated, and the engine is started in the workspace directory with the
    /// descriptor path as its final argument. Both output streams go to the log.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AlreadyRunning`] if the workspace has a run whose outcome
    /// has not been reported yet, in this supervisor or in another process. Any failure
    /// leaves no registered run.
    pub fn start(
        &self,
        workspace: &Workspace,
        descriptor: &JobDescriptor,
    ) -> Result<JobTicket, EngineError> {
        let key = workspace.key().to_string();
        match self.jobs.entry(key.clone()) {
            Entry::Occupied(_) => return Err(EngineError::AlreadyRunning(key)),
            Entry::Vacant(vacant) => {
                vacant.insert(Slot::Starting {
                    log_path: workspace.log_path(),
                });
            }
        }

        match self.launch(workspace, descriptor) {
            Ok((ticket, handle)) => {
                self.jobs.insert(key, Slot::Running(handle));
                Ok(ticket)
            }
            Err(err) => {
                self.jobs.remove(&key);
                Err(err)
            }
        }
    }

    fn launch(
        &self,
        workspace: &Workspace,
        descriptor: &JobDescriptor,
    ) -> Result<(JobTicket, JobHandle), EngineError> {
        let key = workspace.key().to_string();
        let run_lock = claim_run_lock(&workspace.run_lock_path(), &key)?;

        let descriptor_path = workspace.descriptor_path();
        descriptor.write_to(&descriptor_path)?;

        let results_dir = workspace.results_dir();
        fs::create_dir_all(&results_dir).map_err(EngineError::io(&results_dir))?;
        let log_path = workspace.log_path();
        let stdout = File::create(&log_path).map_err(EngineError::io(&log_path))?;
        let stderr = stdout.try_clone().map_err(EngineError::io(&log_path))?;

        let child = Command::new(&self.engine.program)
            .args(&self.engine.args)
            .arg(&descriptor_path)
            .current_dir(workspace.root())
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .spawn()
            .map_err(|source| EngineError::Spawn {
                program: self.engine.program.clone(),
                source,
            })?;

        let ticket = JobTicket {
            workspace: key.clone(),
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            pid: child.id(),
            descriptor_path,
            log_path: log_path.clone(),
        };
        info!(
            workspace = %key,
            run_id = %ticket.run_id,
            pid = ticket.pid,
            "Docking engine started"
        );

        let handle = JobHandle {
            workspace: key,
            run_id: ticket.run_id,
            started_at: ticket.started_at,
            child,
            log_path,
            results_dir,
            _run_lock: run_lock,
        };
        Ok((ticket, handle))
    }

    /// Reports the state of a workspace's run without blocking on the process.
    ///
    /// A terminal status is returned once; afterwards the workspace reads as
    /// [`JobStatus::NotFound`] until the next `start`. A run that is still being
    /// launched reads as running.
    pub fn poll(&self, key: &str) -> Result<JobStatus, EngineError> {
        let observation = {
            let Entry::Occupied(mut occupied) = self.jobs.entry(key.to_string()) else {
                return Ok(JobStatus::NotFound);
            };
            let exit = match occupied.get_mut() {
                Slot::Running(handle) => handle.try_status()?,
                Slot::Starting { .. } => None,
            };
            match exit {
                None => Observation::Running(occupied.get().log_path().to_path_buf()),
                Some(exit) => match occupied.remove() {
                    Slot::Running(handle) => Observation::Exited(handle, exit),
                    Slot::Starting { log_path } => Observation::Running(log_path),
                },
            }
        };

        match observation {
            Observation::Running(log_path) => Ok(JobStatus::Running {
                log: log_tail::read(&log_path)?,
            }),
            Observation::Exited(handle, exit) => Ok(handle.into_outcome(exit)),
        }
    }

    /// Stops a workspace's run and reports its outcome.
    ///
    /// A run that already finished reports its real outcome. Returns `Ok(None)` if
    /// nothing was registered or the run is still being launched.
    pub fn terminate(&self, key: &str) -> Result<Option<JobStatus>, EngineError> {
        let removed = match self.jobs.entry(key.to_string()) {
            Entry::Occupied(occupied) if matches!(occupied.get(), Slot::Running(_)) => {
                Some(occupied.remove())
            }
            Entry::Occupied(_) => {
                debug!(workspace = %key, "Run is still launching; nothing to terminate");
                None
            }
            Entry::Vacant(_) => None,
        };
        let Some(Slot::Running(mut handle)) = removed else {
            return Ok(None);
        };

        let exit = match handle.try_status()? {
            Some(exit) => exit,
            None => {
                debug!(workspace = %key, pid = handle.child.id(), "Killing docking engine");
                if let Err(err) = handle.child.kill() {
                    warn!(workspace = %key, error = %err, "Failed to kill docking engine");
                }
                handle
                    .child
                    .wait()
                    .map_err(EngineError::io(&handle.log_path))?
            }
        };
        Ok(Some(handle.into_outcome(exit)))
    }

    pub fn is_registered(&self, key: &str) -> bool {
        self.jobs.contains_key(key)
    }

    /// Keys of every registered run, sorted.
    pub fn active_runs(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.jobs.iter().map(|entry| entry.key().clone()).collect();
        keys.sort();
        keys
    }
}

/// Opens the run lock file and takes an exclusive, non-blocking lock on it.
fn claim_run_lock(path: &Path, key: &str) -> Result<File, EngineError> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(path)
        .map_err(EngineError::io(path))?;
    match file.try_lock_exclusive() {
        Ok(()) => Ok(file),
        Err(err)
            if err.kind() == io::ErrorKind::WouldBlock
                || err.raw_os_error() == fs4::lock_contended_error().raw_os_error() =>
        {
            debug!(workspace = %key, lock = %path.display(), "Run lock is held elsewhere");
            Err(EngineError::AlreadyRunning(key.to_string()))
        }
        Err(err) => Err(EngineError::io(path)(err)),
    }
}
