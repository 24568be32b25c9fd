use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde_json::{Map, Value, json};

use crate::config::RuntimeConfig;

/// JSONL record stream for one command run.
///
/// Every line carries `ts_unix_ms`, `event`, `run_id`, `command`, `plan_mode`
/// and `session_id`, merged with the event's own fields. Writes are
/// serialized so parallel specialists cannot interleave lines.
#[derive(Debug, Clone)]
pub struct TelemetrySink {
    path: Option<PathBuf>,
    base: Map<String, Value>,
    write_lock: Arc<Mutex<()>>,
}

fn unix_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default()
}

impl TelemetrySink {
    pub fn new(cfg: &RuntimeConfig, command: impl Into<String>) -> Self {
        let mut base = Map::new();
        base.insert(
            "run_id".to_string(),
            json!(format!("{}-{}", unix_ms(), std::process::id())),
        );
        base.insert("command".to_string(), json!(command.into()));
        base.insert("plan_mode".to_string(), json!(cfg.plan_mode.label()));
        base.insert("session_id".to_string(), json!(cfg.session_id));

        Self {
            path: cfg.telemetry_path.clone(),
            base,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// A sink that drops everything.
    pub fn disabled() -> Self {
        Self {
            path: None,
            base: Map::new(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Record one event. Failures are logged, never returned: telemetry must
    /// not fail a trip plan.
    pub fn emit(&self, event: &str, fields: Value) {
        let Some(path) = &self.path else {
            return;
        };

        let mut record = self.base.clone();
        record.insert("ts_unix_ms".to_string(), json!(unix_ms()));
        record.insert("event".to_string(), json!(event));
        if let Value::Object(extra) = fields {
            record.extend(extra);
        }

        if let Err(err) = self.append(path, &Value::Object(record)) {
            tracing::warn!(event, path = %path.display(), error = %err, "telemetry write failed");
        }
    }

    fn append(&self, path: &Path, record: &Value) -> Result<()> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create '{}'", dir.display()))?;
        }

        let mut line = serde_json::to_vec(record).context("failed to encode telemetry record")?;
        line.push(b'\n');

        let _guard = self.write_lock.lock().unwrap_or_else(|poison| poison.into_inner());
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| file.write_all(&line))
            .with_context(|| format!("failed to append to '{}'", path.display()))
    }
}
