//! Scenario runner – execute scripted key flows from YAML files.
//!
//! Each scenario drives a fresh calculator session, so files are
//! self-contained and order-independent.

use crate::calculator::Calculator;
use crate::commands::CommandRegistry;
use crate::context::AppContext;
use crate::keymap;
use crate::types::*;
use std::time::Instant;

/// Load a scenario from a YAML string.
pub fn load_scenario(yaml: &str) -> Result<Scenario, String> {
    serde_yaml::from_str(yaml).map_err(|e| format!("failed to parse scenario YAML: {}", e))
}

/// Execute a scenario and return the overall result.
pub fn run_scenario(
    scenario: &Scenario,
    ctx: &AppContext,
    registry: &CommandRegistry,
) -> ScenarioResult {
    let mut calc = Calculator::new();
    let mut step_results = Vec::new();
    let mut overall = Status::Pass;

    for (i, step) in scenario.steps.iter().enumerate() {
        let result = match step {
            ScenarioStep::Press {
                press,
                expect_display,
            } => {
                let run_id = new_run_id();
                let start = Instant::now();
                keymap::press_keys(&mut calc, press);

                let display_val = calc.display().to_string();
                let mut data = serde_json::json!({
                    "display": display_val,
                    "trail": calc.format_trail(),
                });
                let mut r =
                    CommandResult::pass("press", press, &run_id, start.elapsed().as_millis() as u64);
                if let Some(expected) = expect_display {
                    if *expected != display_val {
                        tracing::warn!(
                            step = i,
                            expected = %expected,
                            actual = %display_val,
                            "scenario display mismatch"
                        );
                        r.status = Status::Fail;
                        data["expected_display"] = serde_json::json!(expected);
                        overall = Status::Fail;
                    }
                }
                r.with_data(data)
            }
            ScenarioStep::Call {
                call,
                args,
                expect_status,
            } => {
                let r = registry.execute(call, args.clone(), &mut calc, ctx);
                if r.status.as_str() != expect_status.as_str() {
                    tracing::warn!(
                        step = i,
                        expected = %expect_status,
                        actual = %r.status.as_str(),
                        "scenario step status mismatch"
                    );
                    overall = Status::Fail;
                }
                r
            }
        };
        step_results.push(result);
    }

    ScenarioResult {
        name: scenario.name.clone(),
        overall_status: overall,
        step_results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_scenario() {
        let yaml = r#"
name: chaining
steps:
  - press: "2+3*4"
  - press: "="
    expect_display: "20"
  - call: "state"
    args: {}
    expect_status: "pass"
"#;
        let s = load_scenario(yaml).expect("should parse");
        assert_eq!(s.name, Some("chaining".into()));
        assert_eq!(s.steps.len(), 3);
    }

    #[test]
    fn parse_scenario_minimal() {
        let yaml = r#"
steps:
  - press: "1+1="
"#;
        let s = load_scenario(yaml).expect("should parse");
        assert!(s.name.is_none());
        assert_eq!(s.steps.len(), 1);
    }

    #[test]
    fn run_scenario_checks_displays() {
        let yaml = r#"
name: percent
steps:
  - press: "200%50="
    expect_display: "100"
"#;
        let scenario = load_scenario(yaml).expect("parse");
        let ctx = AppContext::default_headless();
        let reg = CommandRegistry::new();
        let result = run_scenario(&scenario, &ctx, &reg);
        assert_eq!(result.overall_status, Status::Pass);
        assert_eq!(result.step_results.len(), 1);
    }

    #[test]
    fn display_mismatch_fails_the_scenario() {
        let yaml = r#"
steps:
  - press: "1+1="
    expect_display: "3"
"#;
        let scenario = load_scenario(yaml).expect("parse");
        let ctx = AppContext::default_headless();
        let reg = CommandRegistry::new();
        let result = run_scenario(&scenario, &ctx, &reg);
        assert_eq!(result.overall_status, Status::Fail);
        assert_eq!(result.step_results[0].status, Status::Fail);
        let data = result.step_results[0].data.as_ref().expect("data");
        assert_eq!(data["display"], "2");
        assert_eq!(data["expected_display"], "3");
    }

    #[test]
    fn steps_share_one_session() {
        let yaml = r#"
steps:
  - press: "5"
  - call: "operator"
    args: { op: "+" }
  - press: "5="
    expect_display: "10"
"#;
        let scenario = load_scenario(yaml).expect("parse");
        let ctx = AppContext::default_headless();
        let reg = CommandRegistry::new();
        let result = run_scenario(&scenario, &ctx, &reg);
        assert_eq!(result.overall_status, Status::Pass);
    }
}
