use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Command result – the stable output contract of the harness surface
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResult {
    pub run_id: String,
    pub command: String,
    pub target: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
    pub timing_ms: u64,
    /// Command-specific payload returned on success – usually the rendered
    /// display, trail, and state snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResult {
    fn shell(command: &str, target: &str, run_id: &str, timing_ms: u64, status: Status) -> Self {
        Self {
            run_id: run_id.to_string(),
            command: command.to_string(),
            target: target.to_string(),
            status,
            error: None,
            timing_ms,
            data: None,
        }
    }

    pub fn pass(command: &str, target: &str, run_id: &str, timing_ms: u64) -> Self {
        Self::shell(command, target, run_id, timing_ms, Status::Pass)
    }

    pub fn err(
        command: &str,
        target: &str,
        run_id: &str,
        timing_ms: u64,
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Self {
        let mut r = Self::shell(command, target, run_id, timing_ms, Status::Error);
        r.error = Some(ErrorInfo::new(code, message));
        r
    }

    /// A skip records why the command could not run without counting it as
    /// a failure (missing capability, headless environment).
    pub fn skip(
        command: &str,
        target: &str,
        run_id: &str,
        timing_ms: u64,
        reason: impl Into<String>,
    ) -> Self {
        let mut r = Self::shell(command, target, run_id, timing_ms, Status::Skip);
        r.error = Some(ErrorInfo::new(ErrorCode::Unsupported, reason));
        r
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pass,
    Fail,
    Skip,
    Error,
}

impl Status {
    /// Wire name, identical to the serde form – scenario expectations are
    /// written against these strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "pass",
            Status::Fail => "fail",
            Status::Skip => "skip",
            Status::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl ErrorInfo {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: serde_json::Value::Null,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidInput,
    Unsupported,
    DependencyMissing,
    PermissionDenied,
    IoError,
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::Unsupported => "UNSUPPORTED",
            ErrorCode::DependencyMissing => "DEPENDENCY_MISSING",
            ErrorCode::PermissionDenied => "PERMISSION_DENIED",
            ErrorCode::IoError => "IO_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        })
    }
}

// ---------------------------------------------------------------------------
// Scenario types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    pub steps: Vec<ScenarioStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScenarioStep {
    /// Feed keystrokes and optionally check the resulting display.
    Press {
        press: String,
        #[serde(default)]
        expect_display: Option<String>,
    },
    /// Invoke a registry command with JSON args.
    Call {
        call: String,
        #[serde(default)]
        args: serde_json::Value,
        #[serde(default = "default_expect_status")]
        expect_status: String,
    },
}

fn default_expect_status() -> String {
    "pass".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: Option<String>,
    pub overall_status: Status,
    pub step_results: Vec<CommandResult>,
}

// ---------------------------------------------------------------------------
// Serve / daemon protocol
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonRequest {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<CommandResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

/// Generate a new run ID (UUIDv4).
pub fn new_run_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_names_match_serde() {
        for status in [Status::Pass, Status::Fail, Status::Skip, Status::Error] {
            let wire = serde_json::to_value(status).expect("serialize");
            assert_eq!(wire, status.as_str());
        }
    }

    #[test]
    fn error_code_displays_screaming_snake() {
        assert_eq!(ErrorCode::InvalidInput.to_string(), "INVALID_INPUT");
        assert_eq!(ErrorCode::IoError.to_string(), "IO_ERROR");
    }

    #[test]
    fn error_is_omitted_from_ok_results() {
        let r = CommandResult::pass("call", "press", &new_run_id(), 0);
        let json = serde_json::to_value(&r).expect("serialize");
        assert!(json.get("error").is_none());
        assert_eq!(json["status"], "pass");
    }

    #[test]
    fn skip_carries_its_reason() {
        let r = CommandResult::skip("call", "copy", &new_run_id(), 0, "no clipboard");
        assert_eq!(r.status, Status::Skip);
        let err = r.error.expect("error");
        assert_eq!(err.code, ErrorCode::Unsupported);
        assert_eq!(err.message, "no clipboard");
    }
}
