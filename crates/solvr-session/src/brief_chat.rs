//! Chat-driven brief builder.
//!
//! Each user line goes to the NLP parser. A usable result replaces the brief
//! wholesale and the assistant summarizes it; an unusable one marks the brief
//! irrelevant. The transcript and brief are only touched after an await if
//! the session is still live.

use chrono::FixedOffset;
use solvr_auth::SessionContext;
use solvr_client::MarketplaceApi;
use solvr_core::CoreError;
use solvr_core::brief::BriefState;
use solvr_core::entities::{BriefDisplay, ParsedBrief};
use solvr_core::normalize::format_amount;
use tokio_util::sync::CancellationToken;

use crate::cancel::{ensure_live, or_cancel};
use crate::confirm::{ConfirmOutcome, ConfirmationWorkflow};
use crate::geo::GeolocationProvider;
use crate::transcript::{ChatLine, Speaker};

pub const IRRELEVANT_DEFAULT_TEXT: &str = "I could not find anything relevant to parse.";
pub const CONNECTION_ERROR_TEXT: &str =
    "I'm having trouble connecting to the server. Please try again.";

#[derive(Debug)]
pub struct BriefChat {
    state: BriefState,
    transcript: Vec<ChatLine>,
    offset: FixedOffset,
    currency: String,
}

impl BriefChat {
    /// `offset` sets the zone deadline hours are shown in.
    #[must_use]
    pub fn new(offset: FixedOffset, currency: impl Into<String>) -> Self {
        Self {
            state: BriefState::new(),
            transcript: Vec::new(),
            offset,
            currency: currency.into(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &BriefState {
        &self.state
    }

    #[must_use]
    pub fn transcript(&self) -> &[ChatLine] {
        &self.transcript
    }

    #[must_use]
    pub fn display(&self) -> BriefDisplay {
        self.state.to_display(&self.currency)
    }

    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Handle one line typed by the user and return the assistant's answer.
    ///
    /// Blank input is ignored (`Ok(None)`). Backend failures are absorbed
    /// into [`CONNECTION_ERROR_TEXT`] and leave the brief unchanged.
    ///
    /// # Errors
    ///
    /// [`CoreError::Cancelled`] if `cancel` fires before the parse result is
    /// applied. The user's line stays in the transcript; nothing else changes.
    pub async fn submit(
        &mut self,
        api: &dyn MarketplaceApi,
        ctx: &SessionContext,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<&ChatLine>, CoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        self.transcript.push(ChatLine::new(Speaker::User, text));

        let response = or_cancel(api.parse_text(text, ctx.user_id()), cancel).await?;
        ensure_live(cancel)?;

        let reply = match response {
            Err(error) => {
                tracing::warn!(%error, "brief parse failed");
                CONNECTION_ERROR_TEXT.to_string()
            }
            Ok(response) if !response.success => {
                tracing::warn!(message = ?response.message, "parser reported failure");
                CONNECTION_ERROR_TEXT.to_string()
            }
            Ok(response) => {
                let parsed = ParsedBrief::from_raw(&response.data, self.offset);
                if parsed.is_irrelevant() {
                    let message = parsed
                        .message
                        .unwrap_or_else(|| IRRELEVANT_DEFAULT_TEXT.to_string());
                    self.state.mark_irrelevant();
                    message
                } else {
                    let reply = summary(&parsed, &self.currency);
                    self.state.apply_parsed(parsed);
                    reply
                }
            }
        };

        self.transcript.push(ChatLine::new(Speaker::Assistant, reply));
        Ok(self.transcript.last())
    }

    /// Confirm the current brief and record the outcome in the transcript.
    ///
    /// # Errors
    ///
    /// As [`ConfirmationWorkflow::confirm`]; nothing is recorded on error.
    pub async fn confirm(
        &mut self,
        workflow: &ConfirmationWorkflow,
        api: &dyn MarketplaceApi,
        geo: &dyn GeolocationProvider,
        ctx: &SessionContext,
        cancel: &CancellationToken,
    ) -> Result<ConfirmOutcome, CoreError> {
        let outcome = workflow
            .confirm(&self.state, api, geo, ctx, cancel)
            .await?;
        ensure_live(cancel)?;
        self.transcript
            .push(ChatLine::new(Speaker::Assistant, outcome.narrative()));
        Ok(outcome)
    }
}

/// Assistant summary of a usable parse result.
#[must_use]
pub fn summary(parsed: &ParsedBrief, currency: &str) -> String {
    let need = [
        parsed.urgency.as_deref(),
        Some(parsed.kind.as_deref().unwrap_or("project")),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ");
    let domain = parsed.domain.as_deref().unwrap_or("an unspecified domain");
    let budget = parsed.estimated_price.map_or_else(
        || "I couldn't estimate a budget yet.".to_string(),
        |price| {
            format!(
                "I've estimated the budget around {currency}{}.",
                format_amount(price)
            )
        },
    );
    format!(
        "I've analyzed your request. It looks like you need help with a {need} in {domain}. \
         {budget} Shall we proceed with this brief?"
    )
}
