use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{MessageKind, ProposalStatus, Role};
use crate::errors::CoreError;

/// One entry in a negotiation or brief-builder chat.
///
/// Built only through [`Message::text`] and [`Message::proposal`], so `status`
/// is present exactly when `kind` is [`MessageKind::Proposal`]. Only the
/// message log changes `status` afterwards. Deserialization goes through the
/// same check, so a stored log cannot smuggle in a status-less proposal or a
/// text message with a status.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(try_from = "MessageRepr")]
pub struct Message {
    id: String,
    kind: MessageKind,
    sender: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<ProposalStatus>,
    created_at: DateTime<Utc>,
}

/// Wire shape of [`Message`] before the kind/field checks.
#[derive(Deserialize, JsonSchema)]
struct MessageRepr {
    id: String,
    kind: MessageKind,
    sender: Role,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    price: Option<f64>,
    #[serde(default)]
    status: Option<ProposalStatus>,
    created_at: DateTime<Utc>,
}

impl TryFrom<MessageRepr> for Message {
    type Error = CoreError;

    fn try_from(repr: MessageRepr) -> Result<Self, Self::Error> {
        let MessageRepr {
            id,
            kind,
            sender,
            text,
            price,
            status,
            created_at,
        } = repr;
        match kind {
            MessageKind::Text => {
                if price.is_some() || status.is_some() {
                    return Err(CoreError::Validation(format!(
                        "text message {id} carries proposal fields"
                    )));
                }
                let text = text.ok_or_else(|| {
                    CoreError::Validation(format!("text message {id} has no text"))
                })?;
                Ok(Self::text(id, sender, text, created_at))
            }
            MessageKind::Proposal => {
                if text.is_some() {
                    return Err(CoreError::Validation(format!(
                        "proposal {id} carries text"
                    )));
                }
                let price = price
                    .filter(|p| p.is_finite() && *p > 0.0)
                    .ok_or_else(|| {
                        CoreError::Validation(format!("proposal {id} needs a positive price"))
                    })?;
                let status = status.ok_or_else(|| {
                    CoreError::Validation(format!("proposal {id} has no status"))
                })?;
                let mut message = Self::proposal(id, sender, price, created_at);
                message.status = Some(status);
                Ok(message)
            }
        }
    }
}

impl Message {
    #[must_use]
    pub fn text(
        id: impl Into<String>,
        sender: Role,
        text: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: MessageKind::Text,
            sender,
            text: Some(text.into()),
            price: None,
            status: None,
            created_at,
        }
    }

    /// A new proposal always starts out pending.
    #[must_use]
    pub fn proposal(
        id: impl Into<String>,
        sender: Role,
        price: f64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: MessageKind::Proposal,
            sender,
            text: None,
            price: Some(price),
            status: Some(ProposalStatus::Pending),
            created_at,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        self.kind
    }

    #[must_use]
    pub const fn sender(&self) -> Role {
        self.sender
    }

    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.text.as_deref()
    }

    #[must_use]
    pub const fn price(&self) -> Option<f64> {
        self.price
    }

    #[must_use]
    pub const fn status(&self) -> Option<ProposalStatus> {
        self.status
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub const fn is_proposal(&self) -> bool {
        matches!(self.kind, MessageKind::Proposal)
    }

    #[must_use]
    pub fn is_pending_proposal(&self) -> bool {
        self.status == Some(ProposalStatus::Pending)
    }

    pub(crate) fn set_status(&mut self, status: ProposalStatus) {
        self.status = Some(status);
    }
}
