//! Human and agent output
//!
//! - agent mode: every line on stdout is a JSON envelope with a schema version
//! - human mode: plain text on stdout, errors on stderr

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{json, Value};
use std::io::{self, Write};

use crate::api::ApiError;
use crate::errors::{DetailsError, ErrorKind, ResolveError};

const SCHEMA_VERSION: u8 = 1;

/// Event wrapper with schema version
#[derive(Serialize)]
struct Event<T: Serialize> {
    v: u8,
    #[serde(rename = "type")]
    event_type: String,
    payload: T,
}

/// Output handler
pub struct Output {
    agent_mode: bool,
    stdout: Mutex<Box<dyn Write + Send>>,
}

impl Output {
    pub fn new(agent_mode: bool) -> Self {
        Self::with_writer(agent_mode, Box::new(io::stdout()))
    }

    pub fn with_writer(agent_mode: bool, writer: Box<dyn Write + Send>) -> Self {
        Self {
            agent_mode,
            stdout: Mutex::new(writer),
        }
    }

    pub fn is_agent(&self) -> bool {
        self.agent_mode
    }

    fn write_line(&self, line: &str) {
        let mut out = self.stdout.lock();
        let _ = writeln!(out, "{}", line);
        let _ = out.flush();
    }

    fn emit<T: Serialize>(&self, event_type: &str, payload: T) {
        let event = Event {
            v: SCHEMA_VERSION,
            event_type: event_type.to_string(),
            payload,
        };
        match serde_json::to_string(&event) {
            Ok(line) => self.write_line(&line),
            Err(e) => tracing::error!(error = %e, "failed to encode output event"),
        }
    }

    /// Informational line meant for the user (provenance, progress, success)
    pub fn message(&self, message: &str) {
        if self.agent_mode {
            self.emit("message", json!({ "message": message }));
        } else {
            self.write_line(message);
        }
    }

    /// Final result
    pub fn result<T: Serialize>(&self, data: T) {
        if self.agent_mode {
            self.emit("result", data);
        } else {
            match serde_json::to_string_pretty(&data) {
                Ok(text) => self.write_line(&text),
                Err(e) => tracing::error!(error = %e, "failed to encode result"),
            }
        }
    }

    /// Render an error. The caller decides the exit code.
    pub fn error(&self, err: &ErrorReport) {
        if self.agent_mode {
            self.emit("error", err);
        } else {
            eprintln!("Error [{}][{}]: {}", err.cat, err.code, err.message);
            if let Some(fix) = &err.fix {
                eprintln!("  Fix: {}", fix);
            }
        }
    }
}

/// Structured error shown to the user
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub code: String,
    pub cat: String,
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorReport {
    /// Input error
    pub fn input(code: &str, message: &str) -> Self {
        Self {
            code: code.into(),
            cat: "in".into(),
            retryable: false,
            fix: None,
            message: message.into(),
            details: None,
        }
    }

    /// External service error
    pub fn ext(code: &str, message: &str) -> Self {
        Self {
            code: code.into(),
            cat: "ext".into(),
            retryable: true,
            fix: None,
            message: message.into(),
            details: None,
        }
    }

    /// System error
    pub fn sys(code: &str, message: &str) -> Self {
        Self {
            code: code.into(),
            cat: "sys".into(),
            retryable: false,
            fix: None,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_fix(mut self, fix: Option<&str>) -> Self {
        self.fix = fix.map(String::from);
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Classify a command failure.
    pub fn from_error(err: &anyhow::Error) -> Self {
        let message = format!("{:#}", err);

        if let Some(details) = err.downcast_ref::<DetailsError>() {
            return Self::for_kind(details.kind(), &message)
                .with_fix(details.error.remediation())
                .with_details(json!({
                    "service_id": details.service_id,
                    "service_version": details.version_label(),
                }));
        }
        if let Some(resolve) = err.downcast_ref::<ResolveError>() {
            return Self::for_kind(resolve.kind(), &message).with_fix(resolve.remediation());
        }
        if err.downcast_ref::<ApiError>().is_some() {
            return Self::for_kind(ErrorKind::ApiFailure, &message);
        }
        Self::sys("INTERNAL", &message)
    }

    fn for_kind(kind: ErrorKind, message: &str) -> Self {
        match kind {
            ErrorKind::ApiFailure => Self::ext(kind.code(), message),
            _ => Self::input(kind.code(), message),
        }
    }

    /// Get exit code based on category
    pub fn exit_code(&self) -> i32 {
        match self.cat.as_str() {
            "in" => 1,
            _ => 2,
        }
    }
}
