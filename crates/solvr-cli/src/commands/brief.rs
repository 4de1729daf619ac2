use serde::Serialize;
use solvr_config::SolvrConfig;
use solvr_core::CoreError;
use solvr_session::geo::GeoOptions;
use solvr_session::{BriefChat, ChatLine, ConfirmOutcome, ConfirmationWorkflow};
use tokio_util::sync::CancellationToken;

use crate::bootstrap;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::output::{event, output};
use crate::progress::Progress;
use crate::repl::{BRIEF_HELP, BriefInput, Prompt, cancel_on_interrupt, parse_brief};

#[derive(Serialize)]
struct ConfirmEvent<'a> {
    submitted: bool,
    assignment_id: Option<&'a str>,
    narrative: String,
}

impl<'a> From<&'a ConfirmOutcome> for ConfirmEvent<'a> {
    fn from(outcome: &'a ConfirmOutcome) -> Self {
        let assignment_id = match outcome {
            ConfirmOutcome::Submitted { assignment_id } => assignment_id.as_deref(),
            _ => None,
        };
        Self {
            submitted: outcome.is_submitted(),
            assignment_id,
            narrative: outcome.narrative(),
        }
    }
}

/// Handle `solvr brief`: an NLP-backed brief chat until `/quit` or end of input.
pub async fn handle(flags: &GlobalFlags, config: &SolvrConfig) -> anyhow::Result<()> {
    let api = bootstrap::client(config)?;
    let ctx = bootstrap::session_context(config)?;
    let geo = bootstrap::geolocation(config);
    let currency = config.negotiation.currency_symbol.clone();

    let mut chat = BriefChat::new(config.display.offset()?, currency.clone());
    let workflow = ConfirmationWorkflow::new(GeoOptions::from_config(&config.geolocation), currency);

    let cancel = CancellationToken::new();
    cancel_on_interrupt(&cancel);
    let interactive = flags.format == OutputFormat::Text && !flags.quiet;
    let mut prompt = Prompt::stdin(interactive);
    if interactive {
        eprintln!("{BRIEF_HELP}");
    }

    while let Some(line) = prompt.next_line(&cancel).await? {
        match parse_brief(&line) {
            BriefInput::Empty => {}
            BriefInput::Quit => break,
            BriefInput::Unknown(command) => eprintln!("unknown command /{command}. {BRIEF_HELP}"),
            BriefInput::Show => output(&chat.display(), flags.format)?,
            BriefInput::Text(text) => {
                let progress = Progress::spinner("Analyzing...");
                let reply = chat.submit(&api, &ctx, &text, &cancel).await;
                progress.finish_clear();
                match reply {
                    Ok(Some(line)) => say(line, flags.format)?,
                    Ok(None) => {}
                    Err(CoreError::Cancelled) => break,
                    Err(error) => return Err(error.into()),
                }
            }
            BriefInput::Confirm => {
                let progress = Progress::spinner("Sending brief...");
                let result = chat.confirm(&workflow, &api, &geo, &ctx, &cancel).await;
                progress.finish_clear();
                match result {
                    Ok(outcome) => {
                        event(&outcome.narrative(), &ConfirmEvent::from(&outcome), flags.format)?;
                    }
                    Err(CoreError::Cancelled) => break,
                    Err(error @ (CoreError::BriefIncomplete | CoreError::ConfirmInFlight)) => {
                        eprintln!("{error}");
                    }
                    Err(error) => return Err(error.into()),
                }
            }
        }
    }

    cancel.cancel();
    Ok(())
}

fn say(line: &ChatLine, format: OutputFormat) -> anyhow::Result<()> {
    event(&line.text, line, format)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use solvr_session::ConfirmOutcome;

    use super::ConfirmEvent;

    #[test]
    fn confirm_event_carries_assignment_id() {
        let outcome = ConfirmOutcome::Submitted {
            assignment_id: Some("a-1".into()),
        };
        let value = serde_json::to_value(ConfirmEvent::from(&outcome)).unwrap();
        assert_eq!(value["submitted"], true);
        assert_eq!(value["assignment_id"], "a-1");
    }

    #[test]
    fn failed_confirm_event_has_no_id() {
        let outcome = ConfirmOutcome::Failed {
            status: Some(500),
            detail: "boom".into(),
        };
        let value = serde_json::to_value(ConfirmEvent::from(&outcome)).unwrap();
        assert_eq!(value["submitted"], false);
        assert!(value["assignment_id"].is_null());
        assert_eq!(
            value["narrative"],
            "Could not save the brief — server returned 500"
        );
    }
}
