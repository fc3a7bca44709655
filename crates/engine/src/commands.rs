//! Command registry – the JSON command surface adapters drive.
//!
//! Commands are registered by name and invoked with JSON args against a
//! mutable calculator session plus the context capabilities. Malformed args
//! are errors at this layer; a well-formed arg carrying an unmapped digit or
//! operator is absorbed as a no-op, exactly as the engine operations do.

use crate::calculator::{Calculator, Operator};
use crate::context::AppContext;
use crate::keymap;
use crate::traits::CapError;
use crate::types::*;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Instant;

/// Signature for all engine commands.
pub type CommandHandler = fn(Value, &mut Calculator, &AppContext) -> Result<Value, CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("clipboard: {0}")]
    Clipboard(#[from] CapError),
    #[error("{0}")]
    Other(String),
}

impl CommandError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            CommandError::InvalidInput(_) => ErrorCode::InvalidInput,
            CommandError::Clipboard(CapError::Unsupported(_)) => ErrorCode::Unsupported,
            CommandError::Clipboard(CapError::DependencyMissing(_)) => ErrorCode::DependencyMissing,
            CommandError::Clipboard(CapError::PermissionDenied(_)) => ErrorCode::PermissionDenied,
            CommandError::Clipboard(CapError::Io(_)) => ErrorCode::IoError,
            CommandError::Clipboard(CapError::Other(_)) => ErrorCode::InternalError,
            CommandError::Other(_) => ErrorCode::InternalError,
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

pub struct CommandRegistry {
    handlers: HashMap<String, CommandHandler>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        let mut reg = Self {
            handlers: HashMap::new(),
        };
        reg.register("press", cmd_press);
        reg.register("digit", cmd_digit);
        reg.register("decimal", cmd_decimal);
        reg.register("operator", cmd_operator);
        reg.register("negate", cmd_negate);
        reg.register("equals", cmd_equals);
        reg.register("clear", cmd_clear);
        reg.register("delete", cmd_delete);
        reg.register("state", cmd_state);
        reg.register("trail", cmd_trail);
        reg.register("copy", cmd_copy);
        reg
    }

    pub fn register(&mut self, name: &str, handler: CommandHandler) {
        self.handlers.insert(name.to_string(), handler);
    }

    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    /// Execute a command by name and return a full CommandResult.
    pub fn execute(
        &self,
        name: &str,
        args: Value,
        calc: &mut Calculator,
        ctx: &AppContext,
    ) -> CommandResult {
        let run_id = new_run_id();
        let start = Instant::now();

        let Some(handler) = self.handlers.get(name) else {
            tracing::debug!(command = name, "unknown command");
            return CommandResult::err(
                "call",
                name,
                &run_id,
                start.elapsed().as_millis() as u64,
                ErrorCode::InvalidInput,
                format!("unknown command: {}", name),
            );
        };

        let elapsed = || start.elapsed().as_millis() as u64;
        match handler(args, calc, ctx) {
            Ok(data) => CommandResult::pass("call", name, &run_id, elapsed()).with_data(data),
            Err(e) => match e.error_code() {
                // A missing capability is a skip, not a failure of the run.
                ErrorCode::Unsupported | ErrorCode::DependencyMissing => {
                    CommandResult::skip("call", name, &run_id, elapsed(), e.to_string())
                }
                code => CommandResult::err("call", name, &run_id, elapsed(), code, e.to_string()),
            },
        }
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Built-in commands
// ===========================================================================

fn view(calc: &Calculator) -> Value {
    serde_json::json!({
        "display": calc.display(),
        "trail": calc.format_trail(),
        "state": calc.state(),
    })
}

fn str_arg<'a>(args: &'a Value, field: &str) -> Result<&'a str, CommandError> {
    args.get(field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| CommandError::InvalidInput(format!("missing '{}' string field", field)))
}

/// `press` – feed a key name or a keystroke string through the keymap.
///
/// Args: `{ "key": "2+3=" }` or `{ "key": "Backspace" }`
fn cmd_press(args: Value, calc: &mut Calculator, _ctx: &AppContext) -> Result<Value, CommandError> {
    let keys = str_arg(&args, "key")?;
    keymap::press_keys(calc, keys);
    Ok(view(calc))
}

/// `digit` – enter a single digit. Args: `{ "digit": "7" }`
fn cmd_digit(args: Value, calc: &mut Calculator, _ctx: &AppContext) -> Result<Value, CommandError> {
    let s = str_arg(&args, "digit")?;
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(d), None) => calc.input_digit(d),
        _ => {
            return Err(CommandError::InvalidInput(
                "'digit' must be a single character".into(),
            ))
        }
    }
    Ok(view(calc))
}

fn cmd_decimal(_args: Value, calc: &mut Calculator, _ctx: &AppContext) -> Result<Value, CommandError> {
    calc.input_decimal();
    Ok(view(calc))
}

/// `operator` – choose a pending operator by symbol (display or ASCII
/// alias). Unknown symbols are absorbed silently. Args: `{ "op": "×" }`
fn cmd_operator(args: Value, calc: &mut Calculator, _ctx: &AppContext) -> Result<Value, CommandError> {
    let sym = str_arg(&args, "op")?;
    if let Some(op) = Operator::from_symbol(sym) {
        calc.choose_operator(op);
    }
    Ok(view(calc))
}

fn cmd_negate(_args: Value, calc: &mut Calculator, _ctx: &AppContext) -> Result<Value, CommandError> {
    calc.negate();
    Ok(view(calc))
}

fn cmd_equals(_args: Value, calc: &mut Calculator, _ctx: &AppContext) -> Result<Value, CommandError> {
    calc.equals();
    Ok(view(calc))
}

fn cmd_clear(_args: Value, calc: &mut Calculator, _ctx: &AppContext) -> Result<Value, CommandError> {
    calc.clear_all();
    Ok(view(calc))
}

fn cmd_delete(_args: Value, calc: &mut Calculator, _ctx: &AppContext) -> Result<Value, CommandError> {
    calc.delete_last();
    Ok(view(calc))
}

fn cmd_state(_args: Value, calc: &mut Calculator, _ctx: &AppContext) -> Result<Value, CommandError> {
    Ok(view(calc))
}

fn cmd_trail(_args: Value, calc: &mut Calculator, _ctx: &AppContext) -> Result<Value, CommandError> {
    Ok(serde_json::json!({ "trail": calc.format_trail() }))
}

/// `copy` – put the current display on the system clipboard.
fn cmd_copy(_args: Value, calc: &mut Calculator, ctx: &AppContext) -> Result<Value, CommandError> {
    let text = calc.display().to_string();
    ctx.clipboard().write_text(&text)?;
    Ok(serde_json::json!({ "copied": text }))
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (CommandRegistry, Calculator, AppContext) {
        (
            CommandRegistry::new(),
            Calculator::new(),
            AppContext::default_headless(),
        )
    }

    #[test]
    fn press_drives_a_full_calculation() {
        let (reg, mut calc, ctx) = setup();
        let r = reg.execute(
            "press",
            serde_json::json!({ "key": "2+3*4=" }),
            &mut calc,
            &ctx,
        );
        assert_eq!(r.status, Status::Pass);
        let data = r.data.expect("data");
        assert_eq!(data["display"], "20");
        assert_eq!(data["trail"], "");
    }

    #[test]
    fn individual_commands_compose() {
        let (reg, mut calc, ctx) = setup();
        reg.execute("digit", serde_json::json!({ "digit": "9" }), &mut calc, &ctx);
        reg.execute("operator", serde_json::json!({ "op": "/" }), &mut calc, &ctx);
        reg.execute("digit", serde_json::json!({ "digit": "2" }), &mut calc, &ctx);
        let r = reg.execute("equals", serde_json::json!({}), &mut calc, &ctx);
        assert_eq!(r.data.expect("data")["display"], "4.5");
    }

    #[test]
    fn unknown_command_is_invalid_input() {
        let (reg, mut calc, ctx) = setup();
        let r = reg.execute("nonexistent", serde_json::json!({}), &mut calc, &ctx);
        assert_eq!(r.status, Status::Error);
        assert_eq!(r.error.expect("error").code, ErrorCode::InvalidInput);
    }

    #[test]
    fn missing_arg_field_is_invalid_input() {
        let (reg, mut calc, ctx) = setup();
        let r = reg.execute("digit", serde_json::json!({}), &mut calc, &ctx);
        assert_eq!(r.status, Status::Error);
        assert_eq!(r.error.expect("error").code, ErrorCode::InvalidInput);
    }

    #[test]
    fn unmapped_operator_symbol_is_a_no_op() {
        let (reg, mut calc, ctx) = setup();
        calc.input_digit('5');
        let r = reg.execute(
            "operator",
            serde_json::json!({ "op": "mod" }),
            &mut calc,
            &ctx,
        );
        assert_eq!(r.status, Status::Pass);
        assert_eq!(calc.state().operator, None);
        assert_eq!(calc.state().current, "5");
    }

    #[test]
    fn copy_skips_without_a_clipboard() {
        let (reg, mut calc, ctx) = setup();
        let r = reg.execute("copy", serde_json::json!({}), &mut calc, &ctx);
        assert_eq!(r.status, Status::Skip);
        assert_eq!(r.error.expect("error").code, ErrorCode::Unsupported);
    }

    #[test]
    fn state_reports_the_snapshot() {
        let (reg, mut calc, ctx) = setup();
        reg.execute("press", serde_json::json!({ "key": "7+" }), &mut calc, &ctx);
        let r = reg.execute("state", serde_json::json!({}), &mut calc, &ctx);
        let data = r.data.expect("data");
        assert_eq!(data["state"]["previous"], "7");
        assert_eq!(data["state"]["operator"], "+");
        assert_eq!(data["trail"], "7 +");
    }

    #[test]
    fn list_commands() {
        let reg = CommandRegistry::new();
        let names = reg.list();
        for expected in ["press", "digit", "operator", "equals", "clear", "copy"] {
            assert!(names.contains(&expected), "missing {}", expected);
        }
    }
}
