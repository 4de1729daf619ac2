use serde::Serialize;
use solvr_config::SolvrConfig;
use solvr_core::CoreError;
use solvr_core::entities::Message;
use solvr_core::enums::{MessageKind, Role};
use solvr_core::normalize::format_amount;
use solvr_session::geo::GeoOptions;
use solvr_session::{Negotiation, SimulatedResolver, share_location};
use tokio_util::sync::CancellationToken;

use crate::bootstrap;
use crate::cli::root_commands::NegotiateArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::output::{event, output};
use crate::progress::Progress;
use crate::repl::{NEGOTIATE_HELP, NegotiateInput, Prompt, cancel_on_interrupt, parse_negotiate};

#[derive(Serialize)]
struct LocationEvent {
    shared: bool,
    latitude: Option<f64>,
    longitude: Option<f64>,
    narrative: String,
}

/// Handle `solvr negotiate`: a proposal chat against a simulated counterparty.
pub async fn handle(
    args: &NegotiateArgs,
    flags: &GlobalFlags,
    config: &SolvrConfig,
) -> anyhow::Result<()> {
    let ctx = bootstrap::session_context(config)?;
    let local = args.role.map_or_else(|| ctx.negotiation_role(), Role::from);
    let currency = config.negotiation.currency_symbol.as_str();
    let resolver = SimulatedResolver::from_config(&config.negotiation);
    let options = GeoOptions::from_config(&config.geolocation);
    let geo = bootstrap::geolocation(config);
    let api = bootstrap::client(config)?;

    let mut negotiation = Negotiation::greeted(local);
    let cancel = CancellationToken::new();
    cancel_on_interrupt(&cancel);
    let interactive = flags.format == OutputFormat::Text && !flags.quiet;
    let mut prompt = Prompt::stdin(interactive);
    if interactive {
        eprintln!("Negotiating as {local} with a simulated {}.", local.counterparty());
        eprintln!("{NEGOTIATE_HELP}");
    }

    let mut shown = 0;
    print_new(&negotiation, &mut shown, currency, flags.format)?;
    while let Some(line) = prompt.next_line(&cancel).await? {
        let result = match parse_negotiate(&line) {
            NegotiateInput::Empty => Ok(()),
            NegotiateInput::Quit => break,
            NegotiateInput::Usage(usage) => {
                eprintln!("usage: {usage}");
                Ok(())
            }
            NegotiateInput::Unknown(command) => {
                eprintln!("unknown command /{command}. {NEGOTIATE_HELP}");
                Ok(())
            }
            NegotiateInput::Log => {
                output(&negotiation.log().messages(), flags.format)?;
                shown = negotiation.log().len();
                Ok(())
            }
            NegotiateInput::Text(text) => {
                negotiation.send_text(local, &text);
                print_new(&negotiation, &mut shown, currency, flags.format)?;
                let progress = Progress::spinner("Waiting for a reply...");
                let reply = negotiation.await_text_reply(&text, &resolver, &cancel).await;
                progress.finish_clear();
                reply.map(|_| ())
            }
            NegotiateInput::Offer(price) => {
                let id = match negotiation.submit_proposal_str(&price, local) {
                    Ok(message) => message.id().to_string(),
                    Err(error) => {
                        eprintln!("{error}");
                        continue;
                    }
                };
                print_new(&negotiation, &mut shown, currency, flags.format)?;
                let progress = Progress::spinner("Counterparty is thinking...");
                let answer = negotiation.await_counterparty(&id, &resolver, &cancel).await;
                progress.finish_clear();
                answer.map(|_| ())
            }
            NegotiateInput::Accept(id) => negotiation.accept(&id).map(|_| ()),
            NegotiateInput::Reject(id) => negotiation.reject(&id).map(|_| ()),
            NegotiateInput::Location => {
                let progress = Progress::spinner("Sharing location...");
                let shared = share_location(&api, &geo, &ctx, &options, &cancel).await;
                progress.finish_clear();
                match shared {
                    Ok(share) => {
                        let payload = LocationEvent {
                            shared: share.location.is_some(),
                            latitude: share.location.map(|p| p.latitude),
                            longitude: share.location.map(|p| p.longitude),
                            narrative: share.narrative.clone(),
                        };
                        event(&share.narrative, &payload, flags.format)?;
                        Ok(())
                    }
                    Err(error) => Err(error),
                }
            }
        };

        match result {
            Ok(()) => print_new(&negotiation, &mut shown, currency, flags.format)?,
            Err(CoreError::Cancelled) => break,
            Err(error) => eprintln!("{error}"),
        }
    }

    cancel.cancel();
    Ok(())
}

/// Print every message appended since the last call.
fn print_new(
    negotiation: &Negotiation,
    shown: &mut usize,
    currency: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    for message in negotiation.log().messages().iter().skip(*shown) {
        let line = describe(message, negotiation.local_role(), currency);
        event(&line, message, format)?;
    }
    *shown = negotiation.log().len();
    Ok(())
}

/// One transcript line, e.g. `[msg-000001] you: offer ₹250 (pending)`.
fn describe(message: &Message, local: Role, currency: &str) -> String {
    let who = if message.sender() == local {
        "you".to_string()
    } else {
        message.sender().to_string()
    };
    let body = match message.kind() {
        MessageKind::Proposal => format!(
            "offer {currency}{} ({})",
            message.price().map_or_else(|| "?".to_string(), format_amount),
            message
                .status()
                .map_or_else(|| "-".to_string(), |status| status.to_string())
        ),
        MessageKind::Text => message.body().unwrap_or_default().to_string(),
    };
    format!("[{}] {who}: {body}", message.id())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use solvr_core::entities::Message;
    use solvr_core::enums::Role;

    use super::describe;

    #[test]
    fn own_proposal_is_attributed_to_you() {
        let message = Message::proposal("msg-000001", Role::Requester, 250.0, Utc::now());
        assert_eq!(
            describe(&message, Role::Requester, "₹"),
            "[msg-000001] you: offer ₹250 (pending)"
        );
    }

    #[test]
    fn counterparty_text_is_attributed_by_role() {
        let message = Message::text(
            "msg-000002",
            Role::Provider,
            "That price works for me. I've accepted your offer!",
            Utc::now(),
        );
        assert_eq!(
            describe(&message, Role::Requester, "₹"),
            "[msg-000002] provider: That price works for me. I've accepted your offer!"
        );
    }
}
