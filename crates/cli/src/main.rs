//! `calcctl` – headless CLI adapter for the calculator engine.
//!
//! Drives the same engine that powers the GUI shells, but from a terminal:
//! an interactive REPL, one-shot keystroke evaluation, scripted scenarios,
//! and a Unix-socket daemon for other processes.

mod repl;
mod serve;

use clap::{Parser, Subcommand};
use engine::types::{new_run_id, ErrorCode, Status};
use engine::{AppContext, Calculator, CommandRegistry, CommandResult};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Preference key for the display theme, shared with the GUI shells.
pub(crate) const THEME_KEY: &str = "theme";
pub(crate) const DEFAULT_THEME: &str = "dark";

// ===========================================================================
// CLI definition
// ===========================================================================

#[derive(Parser)]
#[command(
    name = "calcctl",
    version,
    about = "CLI harness for the calculator engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive calculator session in the terminal.
    Repl,

    /// Feed a keystroke string through a fresh session and print the result.
    Eval {
        /// Keystrokes, e.g. "2+3*4=".
        keys: String,
        /// Output the full result envelope as JSON.
        #[arg(long)]
        json: bool,
        /// Write result JSON to this path.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Invoke an engine command by name with JSON args on a fresh session.
    Call {
        /// Command name (e.g. "press", "digit", "operator", "state").
        cmd: String,
        /// JSON args to pass to the command.
        #[arg(long, default_value = "{}")]
        args: String,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
        /// Write result JSON to this path.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Run a scripted scenario from a YAML file.
    RunScenario {
        /// Path to the scenario YAML file.
        file: PathBuf,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
        /// Write result JSON to this path.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Start daemon mode over a Unix socket.
    Serve {
        /// Path for the Unix domain socket.
        #[arg(long)]
        socket: PathBuf,
    },

    /// Show or set the persisted display theme ("light" or "dark").
    Theme {
        /// New theme value; omit to print the current one.
        value: Option<String>,
    },
}

// ===========================================================================
// Main
// ===========================================================================

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::default_platform();
    let registry = CommandRegistry::new();

    match cli.command {
        Commands::Repl => repl::run(&ctx),
        Commands::Eval { keys, json, out } => cmd_eval(&keys, json, out.as_deref(), &ctx, &registry),
        Commands::Call {
            cmd,
            args,
            json,
            out,
        } => cmd_call(&cmd, &args, json, out.as_deref(), &ctx, &registry),
        Commands::RunScenario { file, json, out } => {
            cmd_run_scenario(&file, json, out.as_deref(), &ctx, &registry)
        }
        Commands::Serve { socket } => serve::run_daemon(socket, ctx, registry).await,
        Commands::Theme { value } => cmd_theme(value.as_deref(), &ctx),
    }
}

// ===========================================================================
// Subcommand implementations
// ===========================================================================

fn cmd_eval(
    keys: &str,
    json: bool,
    out: Option<&Path>,
    ctx: &AppContext,
    registry: &CommandRegistry,
) {
    let mut calc = Calculator::new();
    let result = registry.execute("press", serde_json::json!({ "key": keys }), &mut calc, ctx);

    if json {
        emit_result(&result, true, out);
        return;
    }
    if let Some(path) = out {
        dump_json(path, &result);
    }
    let trail = calc.format_trail();
    if !trail.is_empty() {
        eprintln!("{}", trail);
    }
    println!("{}", calc.display());
    exit_for_status(result.status);
}

fn cmd_call(
    cmd: &str,
    args_str: &str,
    json: bool,
    out: Option<&Path>,
    ctx: &AppContext,
    registry: &CommandRegistry,
) {
    let result = match serde_json::from_str(args_str) {
        Ok(args) => {
            let mut calc = Calculator::new();
            registry.execute(cmd, args, &mut calc, ctx)
        }
        Err(e) => CommandResult::err(
            "call",
            cmd,
            &new_run_id(),
            0,
            ErrorCode::InvalidInput,
            format!("invalid JSON args: {}", e),
        ),
    };
    emit_result(&result, json, out);
}

fn cmd_run_scenario(
    file: &Path,
    json: bool,
    out: Option<&Path>,
    ctx: &AppContext,
    registry: &CommandRegistry,
) {
    let target = file.display().to_string();
    let scenario = std::fs::read_to_string(file)
        .map_err(|e| (ErrorCode::IoError, format!("cannot read scenario file: {}", e)))
        .and_then(|yaml| {
            engine::scenario::load_scenario(&yaml).map_err(|e| (ErrorCode::InvalidInput, e))
        });

    let scenario = match scenario {
        Ok(s) => s,
        Err((code, message)) => {
            let r = CommandResult::err("run-scenario", &target, &new_run_id(), 0, code, message);
            emit_result(&r, json, out);
            return;
        }
    };

    let result = engine::scenario::run_scenario(&scenario, ctx, registry);

    if let Some(path) = out {
        dump_json(path, &result);
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&result).unwrap_or_default());
    } else {
        println!("Scenario: {}", result.name.as_deref().unwrap_or("<unnamed>"));
        println!("Overall: {}", result.overall_status.as_str());
        for (i, sr) in result.step_results.iter().enumerate() {
            println!(
                "  step {}: {} -> {} ({}ms)",
                i,
                sr.target,
                sr.status.as_str(),
                sr.timing_ms
            );
        }
    }
    exit_for_status(result.overall_status);
}

fn cmd_theme(value: Option<&str>, ctx: &AppContext) {
    match value {
        None => match ctx.prefs().get(THEME_KEY) {
            Ok(theme) => println!("{}", theme.as_deref().unwrap_or(DEFAULT_THEME)),
            Err(e) => {
                eprintln!("error: cannot read theme preference: {}", e);
                std::process::exit(2);
            }
        },
        Some(v) if v == "light" || v == "dark" => {
            if let Err(e) = ctx.prefs().set(THEME_KEY, v) {
                eprintln!("error: cannot persist theme preference: {}", e);
                std::process::exit(2);
            }
            println!("theme set to {}", v);
        }
        Some(other) => {
            eprintln!("error: invalid theme '{}' (expected: light, dark)", other);
            std::process::exit(2);
        }
    }
}

// ===========================================================================
// Output helpers
// ===========================================================================

fn emit_result(result: &CommandResult, json: bool, out: Option<&Path>) {
    if let Some(path) = out {
        dump_json(path, result);
    }
    if json {
        println!("{}", serde_json::to_string_pretty(result).unwrap_or_default());
    } else {
        render_human(result);
    }
    exit_for_status(result.status);
}

fn render_human(r: &CommandResult) {
    println!(
        "[{}] {} {} ({}ms)",
        r.status.as_str().to_uppercase(),
        r.command,
        r.target,
        r.timing_ms
    );
    if let Some(ref err) = r.error {
        println!("  error: {} – {}", err.code, err.message);
    }
    if let Some(ref data) = r.data {
        if let Ok(pretty) = serde_json::to_string_pretty(data) {
            for line in pretty.lines() {
                println!("  {}", line);
            }
        }
    }
    println!("  run: {}", r.run_id);
}

fn dump_json<T: Serialize>(path: &Path, value: &T) {
    let pretty = serde_json::to_string_pretty(value).unwrap_or_default();
    if let Err(e) = std::fs::write(path, pretty) {
        eprintln!(
            "warning: failed to write result to {}: {}",
            path.display(),
            e
        );
    }
}

fn exit_for_status(status: Status) {
    match status {
        Status::Pass | Status::Skip => {}
        Status::Fail => std::process::exit(1),
        Status::Error => std::process::exit(2),
    }
}
