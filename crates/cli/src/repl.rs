//! Interactive REPL – the terminal rendition of the calculator UI.
//!
//! Every line is fed through the shared keymap, then the pending trail and
//! the display are re-rendered, mirroring how the GUI shells repaint after
//! each button press.

use crate::{DEFAULT_THEME, THEME_KEY};
use dialoguer::{theme::ColorfulTheme, Input};
use engine::{keymap, AppContext, Calculator};

pub fn run(ctx: &AppContext) {
    println!("calcctl repl – digits, . + - * / % n, c clears, empty line = equals");
    println!("commands: :q quit, :del delete last, :copy/:paste clipboard, :theme [light|dark]");

    let mut calc = Calculator::new();
    loop {
        let trail = calc.format_trail();
        let prompt = if trail.is_empty() {
            calc.display().to_string()
        } else {
            format!("{} | {}", trail, calc.display())
        };

        let line: String = match Input::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
        {
            Ok(l) => l,
            Err(_) => break, // terminal closed
        };

        match line.trim() {
            ":q" | ":quit" => break,
            ":del" => calc.delete_last(),
            ":copy" => match ctx.clipboard().write_text(calc.display()) {
                Ok(()) => eprintln!("copied: {}", calc.display()),
                Err(e) => eprintln!("copy failed: {}", e),
            },
            ":paste" => match ctx.clipboard().read_text() {
                Ok(text) => keymap::press_keys(&mut calc, text.trim()),
                Err(e) => eprintln!("paste failed: {}", e),
            },
            "" => calc.equals(),
            cmd if cmd.starts_with(":theme") => handle_theme(cmd, ctx),
            keys => keymap::press_keys(&mut calc, keys),
        }
    }
}

fn handle_theme(cmd: &str, ctx: &AppContext) {
    match cmd.split_whitespace().nth(1) {
        None => match ctx.prefs().get(THEME_KEY) {
            Ok(theme) => eprintln!("theme: {}", theme.as_deref().unwrap_or(DEFAULT_THEME)),
            Err(e) => eprintln!("cannot read theme: {}", e),
        },
        Some(v) if v == "light" || v == "dark" => match ctx.prefs().set(THEME_KEY, v) {
            Ok(()) => eprintln!("theme set to {}", v),
            Err(e) => eprintln!("cannot persist theme: {}", e),
        },
        Some(other) => eprintln!("invalid theme '{}' (expected: light, dark)", other),
    }
}
