//! Calculator core – the state machine behind every adapter surface.
//!
//! Holds the numeral being edited, the committed left operand, and the
//! pending operator. All mutation goes through the command methods below;
//! adapters only ever read back a [`Snapshot`] or the display string.

use crate::format::format_result;
use crate::keymap::Action;
use serde::{Deserialize, Serialize};

/// In-band sentinel shown in place of a numeral after divide-by-zero
/// or overflow. Cleared only by `clear_all` / `delete_last`.
pub const ERROR_DISPLAY: &str = "Error";

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

/// The five binary operators, keyed by their display symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "−")]
    Subtract,
    #[serde(rename = "×")]
    Multiply,
    #[serde(rename = "÷")]
    Divide,
    #[serde(rename = "%")]
    Percent,
}

impl Operator {
    /// Parse an operator from its display symbol or its ASCII keyboard
    /// alias (`-` → `−`, `*` → `×`, `/` → `÷`). Unknown symbols are `None`.
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "+" => Some(Operator::Add),
            "−" | "-" => Some(Operator::Subtract),
            "×" | "*" => Some(Operator::Multiply),
            "÷" | "/" => Some(Operator::Divide),
            "%" => Some(Operator::Percent),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "−",
            Operator::Multiply => "×",
            Operator::Divide => "÷",
            Operator::Percent => "%",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

// ---------------------------------------------------------------------------
// State snapshot
// ---------------------------------------------------------------------------

/// Read-only copy of the full calculator state, for rendering and the
/// JSON command surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub current: String,
    pub previous: String,
    pub operator: Option<Operator>,
    pub just_evaluated: bool,
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

/// One calculator session. Synchronous, single-owner; callers sharing a
/// session across threads must serialize access themselves.
#[derive(Debug, Clone)]
pub struct Calculator {
    /// Numeral under construction (or the error sentinel). Never holds
    /// anything but digits, one optional `.`, and an optional leading `-`.
    current: String,
    /// Left operand already committed to the pending operation, or empty.
    previous: String,
    operator: Option<Operator>,
    just_evaluated: bool,
}

impl Calculator {
    pub fn new() -> Self {
        Self {
            current: "0".to_string(),
            previous: String::new(),
            operator: None,
            just_evaluated: false,
        }
    }

    /// Append a digit. Non-digits are absorbed silently; the first digit
    /// after an evaluation starts a fresh numeral.
    pub fn input_digit(&mut self, d: char) {
        if !d.is_ascii_digit() || self.current == ERROR_DISPLAY {
            return;
        }
        if self.just_evaluated {
            self.current = d.to_string();
            self.just_evaluated = false;
            return;
        }
        if self.current == "0" {
            self.current.clear();
        }
        self.current.push(d);
    }

    /// Append the decimal point, at most once per numeral.
    pub fn input_decimal(&mut self) {
        if self.current == ERROR_DISPLAY {
            return;
        }
        if self.just_evaluated {
            self.current = "0.".to_string();
            self.just_evaluated = false;
            return;
        }
        if !self.current.contains('.') {
            self.current.push('.');
        }
    }

    /// Commit the current numeral as the left operand of `op`.
    ///
    /// If an operation is already pending with both operands entered, it is
    /// evaluated first and its result becomes the new left operand – strict
    /// left-to-right chaining, no precedence.
    pub fn choose_operator(&mut self, op: Operator) {
        if self.current == ERROR_DISPLAY {
            return;
        }
        match self.operator {
            Some(pending) if !self.previous.is_empty() && !self.current.is_empty() => {
                self.previous = compute(&self.previous, &self.current, pending);
                self.current.clear();
            }
            _ if !self.current.is_empty() => {
                self.previous = std::mem::take(&mut self.current);
            }
            _ => {}
        }
        self.operator = Some(op);
        self.just_evaluated = false;
    }

    /// Toggle a leading `-` on the current numeral.
    pub fn negate(&mut self) {
        if self.current.is_empty() || self.current == "0" || self.current == ERROR_DISPLAY {
            return;
        }
        if let Some(stripped) = self.current.strip_prefix('-') {
            self.current = stripped.to_string();
        } else {
            self.current.insert(0, '-');
        }
    }

    /// Evaluate the pending operation and show the formatted result.
    /// No-op unless an operator is pending with both operands entered.
    pub fn equals(&mut self) {
        let Some(op) = self.operator else { return };
        if self.previous.is_empty() || self.current.is_empty() {
            return;
        }
        let raw = compute(&self.previous, &self.current, op);
        self.current = format_result(&raw);
        self.previous.clear();
        self.operator = None;
        // An errored evaluation is not a result the next digit may replace.
        self.just_evaluated = self.current != ERROR_DISPLAY;
    }

    /// Reset everything to the initial state.
    pub fn clear_all(&mut self) {
        self.current = "0".to_string();
        self.previous.clear();
        self.operator = None;
        self.just_evaluated = false;
    }

    /// Remove the last character of the current numeral, bottoming out at
    /// `"0"`. Recovers the error sentinel by resetting.
    pub fn delete_last(&mut self) {
        if self.just_evaluated {
            self.just_evaluated = false;
        }
        if self.current == ERROR_DISPLAY {
            self.clear_all();
            return;
        }
        if self.current.len() > 1 {
            self.current.pop();
        } else {
            self.current = "0".to_string();
        }
    }

    /// Dispatch a mapped key action to the corresponding operation.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Digit(d) => self.input_digit(d),
            Action::Decimal => self.input_decimal(),
            Action::Operator(op) => self.choose_operator(op),
            Action::Negate => self.negate(),
            Action::Equals => self.equals(),
            Action::Clear => self.clear_all(),
            Action::Delete => self.delete_last(),
        }
    }

    /// The string an adapter should render: `current`, or `"0"` while a
    /// right operand has not been started yet.
    pub fn display(&self) -> &str {
        if self.current.is_empty() {
            "0"
        } else {
            &self.current
        }
    }

    /// Pending operand and operator for the secondary display line, empty
    /// when nothing is pending.
    pub fn format_trail(&self) -> String {
        if self.previous.is_empty() {
            return String::new();
        }
        match self.operator {
            Some(op) => format!("{} {}", self.previous, op),
            None => self.previous.clone(),
        }
    }

    pub fn state(&self) -> Snapshot {
        Snapshot {
            current: self.current.clone(),
            previous: self.previous.clone(),
            operator: self.operator,
            just_evaluated: self.just_evaluated,
        }
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------

/// Apply `op` to two in-progress numerals, returning the raw (unformatted)
/// result numeral. Unparseable operands fall back to `a` unchanged; division
/// by zero yields the error sentinel.
fn compute(a: &str, b: &str, op: Operator) -> String {
    let (lhs, rhs) = match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(l), Ok(r)) => (l, r),
        _ => return a.to_string(),
    };
    match op {
        Operator::Divide => {
            if rhs == 0.0 {
                ERROR_DISPLAY.to_string()
            } else {
                (lhs / rhs).to_string()
            }
        }
        Operator::Multiply => (lhs * rhs).to_string(),
        Operator::Subtract => (lhs - rhs).to_string(),
        Operator::Add => (lhs + rhs).to_string(),
        // Percentage-of, not modulo: `a % b` reads "b percent of a".
        Operator::Percent => (lhs * (rhs / 100.0)).to_string(),
    }
}

// ===========================================================================
// Tests
// ===========================================================================
