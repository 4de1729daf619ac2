//! Append-only message log.
//!
//! Read order always equals insertion order. No reordering, deduplication, or
//! deletion is ever performed. The only in-place mutation is a proposal status
//! change validated against [`ProposalStatus::allowed_next_states`].

use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;

use crate::entities::Message;
use crate::enums::{MessageKind, ProposalStatus, Role};
use crate::errors::CoreError;
use crate::ids::IdSequence;

/// Ordered chat history owned by one session.
#[derive(Debug, Default, Serialize)]
pub struct MessageLog {
    messages: Vec<Message>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    #[serde(skip)]
    ids: IdSequence,
}

impl MessageLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh message id from this log's sequence.
    pub fn next_id(&mut self) -> String {
        loop {
            let id = self.ids.next_id();
            if !self.index.contains_key(&id) {
                return id;
            }
        }
    }

    /// Append a message at the end of the log.
    ///
    /// # Panics
    ///
    /// Panics if a message with the same id is already in the log. Ids are
    /// allocated by [`next_id`](Self::next_id); a collision is a programming
    /// error.
    pub fn append(&mut self, message: Message) -> &Message {
        assert!(
            !self.index.contains_key(message.id()),
            "duplicate message id appended to log: {}",
            message.id()
        );
        let position = self.messages.len();
        self.index.insert(message.id().to_string(), position);
        self.messages.push(message);
        &self.messages[position]
    }

    /// Append a text message with a freshly allocated id.
    pub fn push_text(&mut self, sender: Role, text: impl Into<String>) -> &Message {
        let id = self.next_id();
        self.append(Message::text(id, sender, text, Utc::now()))
    }

    /// Append a pending proposal with a freshly allocated id.
    ///
    /// The price is not validated here; see the proposal lifecycle manager.
    pub fn push_proposal(&mut self, sender: Role, price: f64) -> &Message {
        let id = self.next_id();
        self.append(Message::proposal(id, sender, price, Utc::now()))
    }

    /// Move a pending proposal to a new status.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if no message has `id`.
    /// - [`CoreError::InvalidTransition`] if the message is not a proposal, is
    ///   already terminal, or `new_status` is not reachable from its status.
    ///
    /// On error the log is unchanged.
    pub fn update_status(
        &mut self,
        id: &str,
        new_status: ProposalStatus,
    ) -> Result<&Message, CoreError> {
        let position = *self
            .index
            .get(id)
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;
        let message = &mut self.messages[position];

        let current = match (message.kind(), message.status()) {
            (MessageKind::Proposal, Some(status)) => status,
            (kind, _) => {
                return Err(CoreError::InvalidTransition {
                    id: id.to_string(),
                    from: kind.to_string(),
                    to: new_status.to_string(),
                });
            }
        };

        if !current.can_transition_to(new_status) {
            return Err(CoreError::InvalidTransition {
                id: id.to_string(),
                from: current.to_string(),
                to: new_status.to_string(),
            });
        }

        message.set_status(new_status);
        tracing::debug!(id, from = %current, to = %new_status, "proposal status updated");
        Ok(&self.messages[position])
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Message> {
        self.index.get(id).map(|&position| &self.messages[position])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Proposals still waiting for an answer, oldest first.
    pub fn pending_proposals(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.is_pending_proposal())
    }
}

impl<'a> IntoIterator for &'a MessageLog {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}
