//! Job tracking for background dataset reloads.
//!
//! A reload fetches every source table again, which can take a while for
//! remote sources. The HTTP layer answers immediately with a job id and the
//! client polls the job for progress and outcome.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single log entry with timestamp and message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Running,
    Completed,
    Failed,
}

/// What a job does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    DatasetReload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub job_id: String,
    pub kind: JobKind,
    pub status: JobStatus,
    pub logs: Vec<LogEntry>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Outcome of a completed job (for reloads, the merge summary).
    pub result: Option<serde_json::Value>,
    #[serde(skip)]
    seq: u64,
}

impl Job {
    pub fn is_finished(&self) -> bool {
        self.status != JobStatus::Running
    }
}

/// Finished jobs kept for polling; older ones are dropped when a new job starts.
pub const MAX_FINISHED_JOBS: usize = 16;

/// In-memory job tracker.
#[derive(Clone, Default)]
pub struct JobTracker {
    jobs: Arc<RwLock<HashMap<String, Job>>>,
    next_seq: Arc<AtomicU64>,
}

impl JobTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a running job and return its id.
    pub fn create_job(&self, kind: JobKind) -> String {
        let mut jobs = self.jobs.write();
        self.insert_job(&mut jobs, kind)
    }

    /// Register a running job unless one of the same kind is still running.
    ///
    /// The check and the insert happen under one write lock, so concurrent
    /// callers cannot both succeed.
    pub fn try_create_job(&self, kind: JobKind) -> Option<String> {
        let mut jobs = self.jobs.write();
        if Self::running_in(&jobs, kind) {
            return None;
        }
        Some(self.insert_job(&mut jobs, kind))
    }

    fn insert_job(&self, jobs: &mut HashMap<String, Job>, kind: JobKind) -> String {
        Self::prune_finished(jobs);
        let job_id = Uuid::new_v4().to_string();
        let job = Job {
            job_id: job_id.clone(),
            kind,
            status: JobStatus::Running,
            logs: vec![],
            created_at: Utc::now(),
            completed_at: None,
            result: None,
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
        };
        jobs.insert(job_id.clone(), job);
        job_id
    }

    /// Keep only the most recently started finished jobs, up to [`MAX_FINISHED_JOBS`].
    fn prune_finished(jobs: &mut HashMap<String, Job>) {
        let mut finished: Vec<(u64, String)> = jobs
            .values()
            .filter(|job| job.is_finished())
            .map(|job| (job.seq, job.job_id.clone()))
            .collect();
        if finished.len() <= MAX_FINISHED_JOBS {
            return;
        }
        finished.sort();
        let excess = finished.len() - MAX_FINISHED_JOBS;
        for (_, job_id) in finished.into_iter().take(excess) {
            jobs.remove(&job_id);
        }
    }

    fn running_in(jobs: &HashMap<String, Job>, kind: JobKind) -> bool {
        jobs.values()
            .any(|job| job.kind == kind && job.status == JobStatus::Running)
    }

    /// Append a log entry. Unknown ids are ignored.
    pub fn log(&self, job_id: &str, level: LogLevel, message: impl Into<String>) {
        if let Some(job) = self.jobs.write().get_mut(job_id) {
            job.logs.push(LogEntry {
                timestamp: Utc::now(),
                level,
                message: message.into(),
            });
        }
    }

    pub fn complete_job(&self, job_id: &str, result: Option<serde_json::Value>) {
        if let Some(job) = self.jobs.write().get_mut(job_id) {
            job.status = JobStatus::Completed;
            job.completed_at = Some(Utc::now());
            job.result = result;
        }
    }

    /// Mark a job as failed; the message becomes its last log entry.
    pub fn fail_job(&self, job_id: &str, error_message: impl Into<String>) {
        if let Some(job) = self.jobs.write().get_mut(job_id) {
            let now = Utc::now();
            job.status = JobStatus::Failed;
            job.completed_at = Some(now);
            job.logs.push(LogEntry {
                timestamp: now,
                level: LogLevel::Error,
                message: error_message.into(),
            });
        }
    }

    pub fn get_job(&self, job_id: &str) -> Option<Job> {
        self.jobs.read().get(job_id).cloned()
    }

    pub fn get_logs(&self, job_id: &str) -> Vec<LogEntry> {
        self.jobs
            .read()
            .get(job_id)
            .map(|job| job.logs.clone())
            .unwrap_or_default()
    }

    /// Whether a job of `kind` is still running.
    pub fn has_running(&self, kind: JobKind) -> bool {
        Self::running_in(&self.jobs.read(), kind)
    }
}
