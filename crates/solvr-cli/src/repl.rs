//! Line-oriented input for the interactive commands.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio_util::sync::CancellationToken;

/// One line typed into `solvr brief`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BriefInput {
    Text(String),
    Confirm,
    Show,
    Quit,
    Empty,
    Unknown(String),
}

pub const BRIEF_HELP: &str =
    "Describe your project in plain words. Commands: /confirm, /brief, /quit";

#[must_use]
pub fn parse_brief(line: &str) -> BriefInput {
    let line = line.trim();
    if line.is_empty() {
        return BriefInput::Empty;
    }
    let Some((command, _)) = split_command(line) else {
        return BriefInput::Text(line.to_string());
    };
    match command {
        "confirm" => BriefInput::Confirm,
        "brief" => BriefInput::Show,
        "quit" | "exit" => BriefInput::Quit,
        other => BriefInput::Unknown(other.to_string()),
    }
}

/// One line typed into `solvr negotiate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NegotiateInput {
    Text(String),
    Offer(String),
    Accept(String),
    Reject(String),
    Log,
    Location,
    Quit,
    Empty,
    Usage(&'static str),
    Unknown(String),
}

pub const NEGOTIATE_HELP: &str = "Chat freely, or use /offer <price>, /accept <id>, \
    /reject <id>, /log, /location, /quit";

#[must_use]
pub fn parse_negotiate(line: &str) -> NegotiateInput {
    let line = line.trim();
    if line.is_empty() {
        return NegotiateInput::Empty;
    }
    let Some((command, arg)) = split_command(line) else {
        return NegotiateInput::Text(line.to_string());
    };
    let arg = arg.map(str::to_string);
    match (command, arg) {
        ("offer", Some(price)) => NegotiateInput::Offer(price),
        ("offer", None) => NegotiateInput::Usage("/offer <price>"),
        ("accept", Some(id)) => NegotiateInput::Accept(id),
        ("accept", None) => NegotiateInput::Usage("/accept <id>"),
        ("reject", Some(id)) => NegotiateInput::Reject(id),
        ("reject", None) => NegotiateInput::Usage("/reject <id>"),
        ("log", _) => NegotiateInput::Log,
        ("location", _) => NegotiateInput::Location,
        ("quit" | "exit", _) => NegotiateInput::Quit,
        (other, _) => NegotiateInput::Unknown(other.to_string()),
    }
}

/// `/name rest` as `("name", Some("rest"))`. `None` for plain text.
fn split_command(line: &str) -> Option<(&str, Option<&str>)> {
    let rest = line.strip_prefix('/')?;
    let (command, arg) = match rest.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (rest, None),
    };
    Some((command, arg))
}

/// Reads stdin one line at a time, printing a prompt on stderr when
/// interactive.
pub struct Prompt {
    lines: Lines<BufReader<Stdin>>,
    marker: Option<&'static str>,
}

impl Prompt {
    pub fn stdin(show_marker: bool) -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            marker: show_marker.then_some("> "),
        }
    }

    /// The next line, or `None` at end of input or once `cancel` fires.
    pub async fn next_line(&mut self, cancel: &CancellationToken) -> anyhow::Result<Option<String>> {
        if let Some(marker) = self.marker {
            let mut stderr = std::io::stderr();
            let _ = write!(stderr, "{marker}");
            let _ = stderr.flush();
        }
        tokio::select! {
            biased;
            () = cancel.cancelled() => Ok(None),
            line = self.lines.next_line() => Ok(line?),
        }
    }
}

/// Cancel `token` on Ctrl-C so in-flight work is dropped before it mutates
/// the session.
pub fn cancel_on_interrupt(token: &CancellationToken) {
    let token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("interrupt received, cancelling session");
            token.cancel();
        }
    });
}
