//! # Host Script Parser
//!
//! Line-based scripts that drive the host deterministically.
//!
//! ## Format
//!
//! - `dispatch <json>` - Dispatch a wire action, e.g.
//!   `dispatch {"name":"action::ui-context:TOGGLE_THEME"}`
//! - `notify <severity> <text>` - Show a notification with a generated uid
//! - `resize <W>x<H>` - Resize the window (fires one resize event)
//! - `frame` - Run one animation frame
//! - `idle` - Run pending idle callbacks
//! - `editor <slot> <name>` - Mount editor `name` into `slot`
//! - `clear-editor <slot>` - Unmount the editor in `slot`
//! - `focus-out <name>` - Take keyboard focus away from editor `name`
//! - `print` - Render the current UI
//! - Comments: `# This is a comment`
//!
//! ## Example
//!
//! ```text
//! # Open and close the notes palette
//! editor 0 main
//! frame
//! dispatch {"name":"action::ui-context:UPDATE_PALETTE","value":{"type":"core-palette/notes"}}
//! focus-out main
//! dispatch {"name":"action::ui-context:RESET_PALETTE"}
//! frame
//! print
//! ```

use services_notification::Severity;
use services_ui_state::{WindowSize, WireAction};
use std::collections::VecDeque;
use thiserror::Error;

/// Script error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("Empty script")]
    EmptyScript,
}

/// One script command
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    Dispatch(WireAction),
    Notify { severity: Severity, text: String },
    Resize(WindowSize),
    Frame,
    Idle,
    MountEditor { slot: usize, name: String },
    ClearEditor { slot: usize },
    FocusOut { name: String },
    Print,
}

/// A parsed script
///
/// Commands carry the line they came from so runtime errors can point at
/// the script.
#[derive(Debug, Clone)]
pub struct Script {
    commands: VecDeque<(usize, ScriptCommand)>,
}

impl Script {
    /// Parses a script from text
    pub fn from_text(text: &str) -> Result<Self, ScriptError> {
        let mut commands = VecDeque::new();

        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line_num = index + 1;
            let command = parse_line(line).map_err(|message| ScriptError::ParseError {
                line: line_num,
                message,
            })?;
            commands.push_back((line_num, command));
        }

        if commands.is_empty() {
            return Err(ScriptError::EmptyScript);
        }

        Ok(Self { commands })
    }

    /// Takes the next command and its line number
    pub fn next_command(&mut self) -> Option<(usize, ScriptCommand)> {
        self.commands.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

fn parse_line(line: &str) -> Result<ScriptCommand, String> {
    let (keyword, rest) = match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    };

    match keyword {
        "dispatch" => {
            let wire: WireAction = serde_json::from_str(required(rest, "action JSON")?)
                .map_err(|e| format!("invalid action: {}", e))?;
            Ok(ScriptCommand::Dispatch(wire))
        }
        "notify" => {
            let (severity, text) = required(rest, "severity")?
                .split_once(char::is_whitespace)
                .ok_or_else(|| "missing notification text".to_string())?;
            Ok(ScriptCommand::Notify {
                severity: parse_severity(severity)?,
                text: text.trim().to_string(),
            })
        }
        "resize" => Ok(ScriptCommand::Resize(parse_size(required(rest, "size")?)?)),
        "frame" => no_args(rest, ScriptCommand::Frame),
        "idle" => no_args(rest, ScriptCommand::Idle),
        "print" => no_args(rest, ScriptCommand::Print),
        "editor" => {
            let (slot, name) = required(rest, "slot")?
                .split_once(char::is_whitespace)
                .ok_or_else(|| "missing editor name".to_string())?;
            Ok(ScriptCommand::MountEditor {
                slot: parse_slot(slot)?,
                name: name.trim().to_string(),
            })
        }
        "clear-editor" => Ok(ScriptCommand::ClearEditor {
            slot: parse_slot(required(rest, "slot")?)?,
        }),
        "focus-out" => Ok(ScriptCommand::FocusOut {
            name: required(rest, "editor name")?.to_string(),
        }),
        other => Err(format!("unknown command: {}", other)),
    }
}

fn required<'a>(rest: &'a str, what: &str) -> Result<&'a str, String> {
    if rest.is_empty() {
        Err(format!("missing {}", what))
    } else {
        Ok(rest)
    }
}

fn no_args(rest: &str, command: ScriptCommand) -> Result<ScriptCommand, String> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(format!("unexpected arguments: {}", rest))
    }
}

fn parse_slot(text: &str) -> Result<usize, String> {
    text.trim()
        .parse()
        .map_err(|_| format!("invalid slot: {}", text))
}

/// Parses `1280x800`
fn parse_size(text: &str) -> Result<WindowSize, String> {
    let (width, height) = text
        .split_once('x')
        .ok_or_else(|| format!("invalid size: {}", text))?;
    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width: {}", width))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height: {}", height))?;
    Ok(WindowSize::new(width, height))
}

fn parse_severity(text: &str) -> Result<Severity, String> {
    match text {
        "info" => Ok(Severity::Info),
        "success" => Ok(Severity::Success),
        "warning" => Ok(Severity::Warning),
        "error" => Ok(Severity::Error),
        other => Err(format!("invalid severity: {}", other)),
    }
}
