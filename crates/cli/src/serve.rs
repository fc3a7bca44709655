//! Daemon mode – minimal JSON-RPC-ish protocol over a Unix socket.
//!
//! One calculator session per connection; requests on a connection are
//! processed in order, so the single-owner rule of the engine holds.

use engine::types::*;
use engine::{AppContext, Calculator, CommandRegistry};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;

pub async fn run_daemon(socket_path: PathBuf, ctx: AppContext, registry: CommandRegistry) {
    // Remove stale socket if it exists
    let _ = std::fs::remove_file(&socket_path);

    let listener = match UnixListener::bind(&socket_path) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("error: cannot bind socket {}: {}", socket_path.display(), e);
            std::process::exit(2);
        }
    };

    eprintln!("calcctl daemon listening on {}", socket_path.display());

    loop {
        match listener.accept().await {
            Ok((stream, _addr)) => {
                let (reader, mut writer) = stream.into_split();
                let mut lines = BufReader::new(reader).lines();
                let mut calc = Calculator::new();

                while let Ok(Some(line)) = lines.next_line().await {
                    let response = handle_request(&line, &mut calc, &ctx, &registry);
                    let mut resp_json =
                        serde_json::to_string(&response).unwrap_or_else(|_| "{}".into());
                    resp_json.push('\n');
                    if writer.write_all(resp_json.as_bytes()).await.is_err() {
                        break;
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "accept failed");
            }
        }
    }
}

fn reject(id: &str, message: String) -> DaemonResponse {
    DaemonResponse {
        id: id.to_string(),
        result: None,
        error: Some(ErrorInfo::new(ErrorCode::InvalidInput, message)),
    }
}

fn handle_request(
    line: &str,
    calc: &mut Calculator,
    ctx: &AppContext,
    registry: &CommandRegistry,
) -> DaemonResponse {
    let req: DaemonRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => return reject("unknown", format!("invalid JSON request: {}", e)),
    };

    let result = match req.method.as_str() {
        "call" => {
            let cmd_name = req.params.get("cmd").and_then(|v| v.as_str()).unwrap_or("");
            let args = req
                .params
                .get("args")
                .cloned()
                .unwrap_or(serde_json::Value::Object(Default::default()));
            registry.execute(cmd_name, args, calc, ctx)
        }
        "press" => {
            let keys = req
                .params
                .get("keys")
                .and_then(|v| v.as_str())
                .unwrap_or("");
            registry.execute("press", serde_json::json!({ "key": keys }), calc, ctx)
        }
        "state" => registry.execute("state", serde_json::json!({}), calc, ctx),
        "reset" => registry.execute("clear", serde_json::json!({}), calc, ctx),
        other => return reject(&req.id, format!("unknown method: {}", other)),
    };

    DaemonResponse {
        id: req.id,
        result: Some(result),
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_drive_one_session() {
        let ctx = AppContext::default_headless();
        let registry = CommandRegistry::new();
        let mut calc = Calculator::new();

        let r = handle_request(
            r#"{"id":"1","method":"press","params":{"keys":"2+3="}}"#,
            &mut calc,
            &ctx,
            &registry,
        );
        let data = r.result.expect("result").data.expect("data");
        assert_eq!(data["display"], "5");

        let r = handle_request(
            r#"{"id":"2","method":"reset","params":{}}"#,
            &mut calc,
            &ctx,
            &registry,
        );
        assert_eq!(r.result.expect("result").data.expect("data")["display"], "0");
    }

    #[test]
    fn unknown_method_is_rejected() {
        let ctx = AppContext::default_headless();
        let registry = CommandRegistry::new();
        let mut calc = Calculator::new();

        let r = handle_request(
            r#"{"id":"3","method":"shutdown","params":{}}"#,
            &mut calc,
            &ctx,
            &registry,
        );
        assert!(r.result.is_none());
        assert_eq!(r.error.expect("error").code, ErrorCode::InvalidInput);
    }

    #[test]
    fn malformed_json_is_rejected() {
        let ctx = AppContext::default_headless();
        let registry = CommandRegistry::new();
        let mut calc = Calculator::new();

        let r = handle_request("not json", &mut calc, &ctx, &registry);
        assert_eq!(r.id, "unknown");
        assert_eq!(r.error.expect("error").code, ErrorCode::InvalidInput);
    }
}
