//! # File Tracking Store
//!
//! An append-only, file-based record of experiment runs:
//!
//! ```text
//! <root>/<run_id>/meta.json
//! <root>/<run_id>/params.json
//! <root>/<run_id>/metrics.jsonl
//! <root>/<run_id>/artifacts/...
//! ```
//!
//! A param may be logged once per run. Metrics are appended, one JSON object per line.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, info};
use uuid::Uuid;

const META_FILE: &str = "meta.json";
const PARAMS_FILE: &str = "params.json";
const METRICS_FILE: &str = "metrics.jsonl";
const ARTIFACTS_DIR: &str = "artifacts";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunStatus {
    Running,
    Finished,
    Failed,
}

/// Identity, tags and lifecycle of a run, stored as `meta.json`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RunMeta {
    pub run_id: String,
    pub run_name: String,
    pub status: RunStatus,
    pub tags: BTreeMap<String, String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

/// One line of `metrics.jsonl`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MetricRecord {
    pub key: String,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct FileTrackingStore {
    root: PathBuf,
}

impl FileTrackingStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates a run directory and writes its initial `meta.json`.
    pub fn start_run(&self, run_name: &str) -> Result<TrackedRun> {
        let run_id = Uuid::new_v4().simple().to_string();
        let dir = self.root.join(&run_id);
        fs::create_dir_all(dir.join(ARTIFACTS_DIR))
            .with_context(|| format!("Failed to create run directory '{}'", dir.display()))?;

        let run = TrackedRun {
            dir,
            meta: RunMeta {
                run_id,
                run_name: run_name.to_string(),
                status: RunStatus::Running,
                tags: BTreeMap::new(),
                start_time: Utc::now(),
                end_time: None,
            },
            params: BTreeMap::new(),
        };
        run.write_meta()?;
        run.write_json(PARAMS_FILE, &run.params)?;
        info!(run_id = %run.meta.run_id, run_name, "Started tracked run");
        Ok(run)
    }

    /// Every run recorded under the root, oldest first.
    pub fn list_runs(&self) -> Result<Vec<RunMeta>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut runs = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let meta_path = entry?.path().join(META_FILE);
            if !meta_path.is_file() {
                continue;
            }
            let content = fs::read_to_string(&meta_path)?;
            let meta: RunMeta = serde_json::from_str(&content)
                .with_context(|| format!("Corrupt run metadata '{}'", meta_path.display()))?;
            runs.push(meta);
        }
        runs.sort_by_key(|m| m.start_time);
        Ok(runs)
    }
}

/// A run in progress. Every logging call is persisted immediately.
#[derive(Debug)]
pub struct TrackedRun {
    dir: PathBuf,
    meta: RunMeta,
    params: BTreeMap<String, String>,
}

impl TrackedRun {
    pub fn run_id(&self) -> &str {
        &self.meta.run_id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn set_tag(&mut self, key: &str, value: &str) -> Result<()> {
        self.meta.tags.insert(key.to_string(), value.to_string());
        self.write_meta()
    }

    /// Logs a param. Re-logging the same key with a different value is an error.
    pub fn log_param(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(existing) = self.params.get(key) {
            if existing == value {
                return Ok(());
            }
            bail!("Param '{key}' was already logged as '{existing}' for run {}", self.meta.run_id);
        }
        self.params.insert(key.to_string(), value.to_string());
        self.write_json(PARAMS_FILE, &self.params)
    }

    pub fn log_params(&mut self, params: &BTreeMap<String, String>) -> Result<()> {
        for (key, value) in params {
            self.log_param(key, value)?;
        }
        Ok(())
    }

    pub fn log_metric(&mut self, key: &str, value: f64) -> Result<()> {
        let record = MetricRecord {
            key: key.to_string(),
            value,
            timestamp: Utc::now(),
        };
        let path = self.dir.join(METRICS_FILE);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open '{}'", path.display()))?;
        writeln!(file, "{}", serde_json::to_string(&record)?)?;
        debug!(key, value, "Logged metric");
        Ok(())
    }

    /// Writes `contents` to `artifacts/<artifact_path>/<file_name>`.
    pub fn log_text_artifact(
        &self,
        artifact_path: &str,
        file_name: &str,
        contents: &str,
    ) -> Result<PathBuf> {
        let dir = self.dir.join(ARTIFACTS_DIR).join(artifact_path);
        fs::create_dir_all(&dir)?;
        let path = dir.join(file_name);
        if path.exists() {
            bail!("Artifact '{}' already exists", path.display());
        }
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write artifact '{}'", path.display()))?;
        Ok(path)
    }

    pub fn log_json_artifact<T: Serialize>(
        &self,
        artifact_path: &str,
        file_name: &str,
        value: &T,
    ) -> Result<PathBuf> {
        let contents = serde_json::to_string_pretty(value)?;
        self.log_text_artifact(artifact_path, file_name, &contents)
    }

    /// Records the end time and final status.
    pub fn finish(mut self, status: RunStatus) -> Result<RunMeta> {
        self.meta.status = status;
        self.meta.end_time = Some(Utc::now());
        self.write_meta()?;
        info!(run_id = %self.meta.run_id, ?status, "Finished tracked run");
        Ok(self.meta)
    }

    fn write_meta(&self) -> Result<()> {
        self.write_json(META_FILE, &self.meta)
    }

    fn write_json<T: Serialize>(&self, file_name: &str, value: &T) -> Result<()> {
        let path = self.dir.join(file_name);
        fs::write(&path, serde_json::to_string_pretty(value)?)
            .with_context(|| format!("Failed to write '{}'", path.display()))
    }
}
