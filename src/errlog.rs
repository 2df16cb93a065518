//! In-memory error log, persisted to disk once the command has finished

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use std::fs::OpenOptions;
use std::io::Write;
use std::panic::Location;
use std::path::Path;
use std::sync::{Arc, OnceLock};

/// Log files at or above this size are truncated before the next write.
pub const FILE_ROTATION_SIZE: u64 = 5 * 1024 * 1024;

const RECORD_SEPARATOR: &str = "------------------------------\n\n";

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub time: DateTime<Utc>,
    pub error: String,
    pub caller: String,
    pub context: BTreeMap<String, String>,
}

/// Append-only collection of errors seen during one invocation.
///
/// Cloning shares the underlying entries.
#[derive(Debug, Clone, Default)]
pub struct ErrorLog {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    #[track_caller]
    pub fn add(&self, err: &dyn fmt::Display) {
        let entry = Self::entry(err, Location::caller());
        self.entries.lock().push(entry);
    }

    #[track_caller]
    pub fn add_with_context<I, K>(&self, err: &dyn fmt::Display, ctx: I)
    where
        I: IntoIterator<Item = (K, String)>,
        K: Into<String>,
    {
        let mut entry = Self::entry(err, Location::caller());
        entry.context = ctx.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self.entries.lock().push(entry);
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn entry(err: &dyn fmt::Display, location: &Location<'_>) -> LogEntry {
        LogEntry {
            time: Utc::now(),
            error: err.to_string(),
            caller: format!("{}:{}", location.file(), location.line()),
            context: BTreeMap::new(),
        }
    }

    /// Append the recorded entries to the log file at `path`.
    ///
    /// Does nothing when no errors were recorded.
    pub fn persist(&self, path: &Path, args: &[String]) -> Result<()> {
        let entries = self.entries();
        if entries.is_empty() {
            return Ok(());
        }

        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create error log directory {:?}", dir))?;
        }

        let oversized = std::fs::metadata(path)
            .map(|m| m.len() >= FILE_ROTATION_SIZE)
            .unwrap_or(false);

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(!oversized)
            .truncate(oversized)
            .open(path)
            .with_context(|| format!("error accessing audit log file {:?}", path))?;

        let mut record = format!("\nCOMMAND:\nfastly {}\n\n", redact_tokens(&args.join(" ")));
        for entry in &entries {
            let _ = write!(
                record,
                "TIMESTAMP:\n{}\n\nERROR:\n{}\n\nCALLER:\n{}\n\n",
                entry.time.to_rfc3339(),
                redact_tokens(&entry.error),
                entry.caller
            );
            for (key, value) in &entry.context {
                let _ = writeln!(record, "  {}: {}", key, value);
            }
            record.push('\n');
        }
        record.push_str(RECORD_SEPARATOR);

        file.write_all(record.as_bytes())
            .with_context(|| format!("Failed to write error log {:?}", path))?;
        Ok(())
    }
}

fn token_patterns() -> &'static (Regex, Regex) {
    static PATTERNS: OnceLock<(Regex, Regex)> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        (
            Regex::new(r"Token ([\w-]+)").expect("valid token regex"),
            Regex::new(r#"(-t|--token)(\s*=?\s*['"]?)([\w-]+)(['"]?)"#).expect("valid flag regex"),
        )
    })
}

/// Replace API tokens in `input` with `REDACTED`.
pub fn redact_tokens(input: &str) -> String {
    let (token, flag) = token_patterns();
    let out = token.replace_all(input, "Token REDACTED");
    flag.replace_all(&out, "${1}${2}REDACTED${4}").into_owned()
}
