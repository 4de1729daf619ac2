//! Proposal lifecycle manager.
//!
//! Drives proposals through `Pending → Accepted | Rejected` on top of a
//! [`MessageLog`]. Every resolution appends exactly one text message from the
//! side that answered. Outcomes come from the caller or from an injected
//! [`ProposalResolver`]; this module never picks one itself.

use solvr_core::CoreError;
use solvr_core::entities::Message;
use solvr_core::enums::{Outcome, Role};
use solvr_core::log::MessageLog;
use solvr_core::normalize::{parse_proposal_amount, proposal_amount};
use tokio_util::sync::CancellationToken;

use crate::cancel::{ensure_live, or_cancel};
use crate::resolver::{PendingProposal, ProposalResolver, ResolverDecision, greeting};

/// One negotiation thread between the local user and a counterparty.
#[derive(Debug)]
pub struct Negotiation {
    local: Role,
    log: MessageLog,
}

impl Negotiation {
    #[must_use]
    pub fn new(local: Role) -> Self {
        Self {
            local,
            log: MessageLog::new(),
        }
    }

    /// A negotiation opened by the counterparty's greeting.
    #[must_use]
    pub fn greeted(local: Role) -> Self {
        let mut negotiation = Self::new(local);
        let counterparty = local.counterparty();
        negotiation.log.push_text(counterparty, greeting(counterparty));
        negotiation
    }

    #[must_use]
    pub const fn local_role(&self) -> Role {
        self.local
    }

    #[must_use]
    pub const fn counterparty_role(&self) -> Role {
        self.local.counterparty()
    }

    #[must_use]
    pub const fn log(&self) -> &MessageLog {
        &self.log
    }

    /// Append a pending proposal.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidAmount`] unless `price` is finite and positive.
    /// Nothing is appended on error.
    pub fn submit_proposal(&mut self, price: f64, sender: Role) -> Result<&Message, CoreError> {
        let price = proposal_amount(price)?;
        let message = self.log.push_proposal(sender, price);
        tracing::debug!(id = message.id(), price, %sender, "proposal submitted");
        Ok(message)
    }

    /// [`submit_proposal`](Self::submit_proposal) for a price typed as text.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidAmount`] for blank, non-numeric, or non-positive input.
    pub fn submit_proposal_str(&mut self, input: &str, sender: Role) -> Result<&Message, CoreError> {
        let price = parse_proposal_amount(input)?;
        self.submit_proposal(price, sender)
    }

    /// Settle a pending proposal and append the responder's message.
    ///
    /// The response is sent by the counterparty of the proposal's sender.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`] or [`CoreError::InvalidTransition`] from the
    /// log. The log is unchanged on error.
    pub fn resolve(
        &mut self,
        id: &str,
        outcome: Outcome,
        response_text: &str,
    ) -> Result<&Message, CoreError> {
        let responder = self.log.update_status(id, outcome.status())?.sender().counterparty();
        tracing::debug!(id, %outcome, %responder, "proposal resolved");
        Ok(self.log.push_text(responder, response_text))
    }

    /// The local user accepts a proposal the counterparty made.
    ///
    /// # Errors
    ///
    /// See [`resolve_as_local`](Self::resolve_as_local).
    pub fn accept(&mut self, id: &str) -> Result<&Message, CoreError> {
        self.resolve_as_local(id, Outcome::Accepted)
    }

    /// The local user rejects a proposal the counterparty made.
    ///
    /// # Errors
    ///
    /// See [`resolve_as_local`](Self::resolve_as_local).
    pub fn reject(&mut self, id: &str) -> Result<&Message, CoreError> {
        self.resolve_as_local(id, Outcome::Rejected)
    }

    /// # Errors
    ///
    /// - [`CoreError::Validation`] if the local user sent the proposal.
    /// - Otherwise as [`resolve`](Self::resolve).
    fn resolve_as_local(&mut self, id: &str, outcome: Outcome) -> Result<&Message, CoreError> {
        if let Some(message) = self.log.get(id)
            && message.is_proposal()
            && message.sender() == self.local
        {
            return Err(CoreError::Validation(format!(
                "{id} is your own proposal; only the counterparty can answer it"
            )));
        }
        let decision = ResolverDecision::narrated(self.local, outcome);
        self.resolve(id, decision.outcome, &decision.text)
    }

    /// Append a chat message. Blank input is ignored and returns `None`.
    pub fn send_text(&mut self, sender: Role, text: &str) -> Option<&Message> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(self.log.push_text(sender, text))
    }

    /// Snapshot of a pending proposal for handing to a resolver.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`] if `id` is absent, or
    /// [`CoreError::InvalidTransition`] if it is not a pending proposal.
    pub fn pending(&self, id: &str) -> Result<PendingProposal, CoreError> {
        let message = self
            .log
            .get(id)
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;
        match (message.is_pending_proposal(), message.price()) {
            (true, Some(price)) => Ok(PendingProposal {
                id: id.to_string(),
                price,
                sender: message.sender(),
            }),
            _ => Err(CoreError::InvalidTransition {
                id: id.to_string(),
                from: message
                    .status()
                    .map_or_else(|| message.kind().to_string(), |s| s.to_string()),
                to: "resolved".into(),
            }),
        }
    }

    /// Apply a decision produced elsewhere, unless the session was cancelled.
    ///
    /// # Errors
    ///
    /// [`CoreError::Cancelled`] with no mutation if `cancel` fired, otherwise
    /// as [`resolve`](Self::resolve).
    pub fn apply_decision(
        &mut self,
        id: &str,
        decision: &ResolverDecision,
        cancel: &CancellationToken,
    ) -> Result<&Message, CoreError> {
        ensure_live(cancel)?;
        self.resolve(id, decision.outcome, &decision.text)
    }

    /// Wait for `resolver` to answer proposal `id`, then apply its decision.
    ///
    /// # Errors
    ///
    /// - [`CoreError::Cancelled`] if `cancel` fires first; the proposal stays
    ///   pending and the log is untouched.
    /// - Any error from [`pending`](Self::pending), the resolver, or
    ///   [`resolve`](Self::resolve).
    pub async fn await_counterparty(
        &mut self,
        id: &str,
        resolver: &dyn ProposalResolver,
        cancel: &CancellationToken,
    ) -> Result<&Message, CoreError> {
        let proposal = self.pending(id)?;
        let decision = or_cancel(resolver.resolve(&proposal), cancel).await??;
        self.apply_decision(id, &decision, cancel)
    }

    /// Let the counterparty answer the latest local text message, if the
    /// resolver has anything to say.
    ///
    /// # Errors
    ///
    /// [`CoreError::Cancelled`] if `cancel` fires first, or a resolver error.
    pub async fn await_text_reply(
        &mut self,
        text: &str,
        resolver: &dyn ProposalResolver,
        cancel: &CancellationToken,
    ) -> Result<Option<&Message>, CoreError> {
        let responder = self.counterparty_role();
        let reply = or_cancel(resolver.reply_to_text(responder, text), cancel).await??;
        ensure_live(cancel)?;
        Ok(reply.and_then(|reply| self.send_text(responder, &reply)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{ScriptedResolver, SimulatedResolver, narrative};
    use pretty_assertions::assert_eq;
    use solvr_core::enums::{MessageKind, ProposalStatus};
    use std::time::Duration;

    #[test]
    fn invalid_prices_append_nothing() {
        let mut n = Negotiation::new(Role::Requester);
        for price in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                n.submit_proposal(price, Role::Requester),
                Err(CoreError::InvalidAmount(_))
            ));
        }
        for input in ["", "  ", "abc", "-1", "12abc"] {
            assert!(n.submit_proposal_str(input, Role::Requester).is_err());
        }
        assert!(n.log().is_empty());
    }

    #[test]
    fn greeted_negotiation_opens_with_counterparty_line() {
        let n = Negotiation::greeted(Role::Requester);
        assert_eq!(n.log().len(), 1);
        let opening = &n.log().messages()[0];
        assert_eq!(opening.sender(), Role::Provider);
        assert_eq!(
            opening.body(),
            Some("Hi! I saw your project brief. I'm interested in working on this.")
        );

        let n = Negotiation::greeted(Role::Provider);
        let opening = &n.log().messages()[0];
        assert_eq!(opening.sender(), Role::Requester);
        assert_eq!(
            opening.body(),
            Some("Hello! I reviewed your profile and I'd like to hire you for my project.")
        );
        assert_eq!(n.log().pending_proposals().count(), 0);
    }

    #[test]
    fn text_input_is_trimmed_and_parsed() {
        let mut n = Negotiation::new(Role::Requester);
        let message = n.submit_proposal_str("  99.5 ", Role::Requester).unwrap();
        assert_eq!(message.price(), Some(99.5));
        assert_eq!(message.status(), Some(ProposalStatus::Pending));
    }

    #[test]
    fn resolution_appends_one_message_from_counterparty() {
        let mut n = Negotiation::new(Role::Requester);
        let id = n.submit_proposal(250.0, Role::Requester).unwrap().id().to_string();

        let reply = n.resolve(&id, Outcome::Rejected, "too low").unwrap();
        assert_eq!(reply.sender(), Role::Provider);
        assert_eq!(reply.kind(), MessageKind::Text);
        assert_eq!(reply.body(), Some("too low"));
        assert_eq!(n.log().len(), 2);
    }

    #[test]
    fn resolving_twice_leaves_log_unchanged() {
        let mut n = Negotiation::new(Role::Provider);
        let id = n.submit_proposal(40.0, Role::Provider).unwrap().id().to_string();
        n.resolve(&id, Outcome::Accepted, "ok").unwrap();
        let before = n.log().messages().to_vec();

        assert!(matches!(
            n.resolve(&id, Outcome::Rejected, "changed my mind"),
            Err(CoreError::InvalidTransition { .. })
        ));
        assert!(matches!(
            n.resolve("missing", Outcome::Accepted, "?"),
            Err(CoreError::NotFound(_))
        ));
        assert_eq!(n.log().messages(), before.as_slice());
    }

    #[test]
    fn local_user_answers_counterparty_proposal() {
        let mut n = Negotiation::new(Role::Requester);
        let id = n.submit_proposal(500.0, Role::Provider).unwrap().id().to_string();

        let reply = n.accept(&id).unwrap();
        assert_eq!(reply.sender(), Role::Requester);
        assert_eq!(reply.body(), Some(narrative(Role::Requester, Outcome::Accepted)));
        assert_eq!(
            n.log().get(&id).unwrap().status(),
            Some(ProposalStatus::Accepted)
        );
    }

    #[test]
    fn local_user_cannot_answer_own_proposal() {
        let mut n = Negotiation::new(Role::Requester);
        let id = n.submit_proposal(500.0, Role::Requester).unwrap().id().to_string();
        assert!(matches!(n.reject(&id), Err(CoreError::Validation(_))));
        assert_eq!(n.log().len(), 1);
    }

    #[test]
    fn blank_text_is_ignored() {
        let mut n = Negotiation::new(Role::Requester);
        assert!(n.send_text(Role::Requester, "   ").is_none());
        assert_eq!(n.send_text(Role::Requester, " hi ").unwrap().body(), Some("hi"));
        assert_eq!(n.log().len(), 1);
    }

    #[tokio::test]
    async fn price_250_end_to_end_with_either_outcome() {
        for outcome in [Outcome::Accepted, Outcome::Rejected] {
            let mut n = Negotiation::new(Role::Requester);
            let id = n.submit_proposal(250.0, Role::Requester).unwrap().id().to_string();
            assert_eq!(n.log().len(), 1);
            assert_eq!(n.log().pending_proposals().count(), 1);

            let resolver = ScriptedResolver::new([outcome]);
            let cancel = CancellationToken::new();
            n.await_counterparty(&id, &resolver, &cancel).await.unwrap();

            assert_eq!(n.log().len(), 2);
            let proposal = n.log().get(&id).unwrap().clone();
            assert_eq!(proposal.status(), Some(outcome.status()));
            assert_eq!(proposal.price(), Some(250.0));

            let again = ScriptedResolver::new([Outcome::Accepted]);
            assert!(n.await_counterparty(&id, &again, &cancel).await.is_err());
            assert!(again.seen().is_empty(), "terminal proposal never reaches a resolver");
            assert_eq!(n.log().get(&id).unwrap(), &proposal);
            assert_eq!(n.log().len(), 2);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_wait_leaves_proposal_pending() {
        let mut n = Negotiation::new(Role::Requester);
        let id = n.submit_proposal(250.0, Role::Requester).unwrap().id().to_string();
        let resolver = SimulatedResolver::default();
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1_000)).await;
            trigger.cancel();
        });

        let err = n.await_counterparty(&id, &resolver, &cancel).await.unwrap_err();
        assert!(matches!(err, CoreError::Cancelled));
        assert_eq!(n.log().len(), 1);
        assert!(n.log().get(&id).unwrap().is_pending_proposal());
    }

    #[test]
    fn late_decision_after_cancel_is_dropped() {
        let mut n = Negotiation::new(Role::Provider);
        let id = n.submit_proposal(10.0, Role::Provider).unwrap().id().to_string();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let decision = ResolverDecision::narrated(Role::Requester, Outcome::Accepted);
        assert!(matches!(
            n.apply_decision(&id, &decision, &cancel),
            Err(CoreError::Cancelled)
        ));
        assert!(n.log().get(&id).unwrap().is_pending_proposal());
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_counterparty_answers_text() {
        let mut n = Negotiation::new(Role::Provider);
        n.send_text(Role::Provider, "Hi, I can start today");
        let resolver = SimulatedResolver::default();
        let reply = n
            .await_text_reply("Hi, I can start today", &resolver, &CancellationToken::new())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply.sender(), Role::Requester);
        assert_eq!(
            reply.body(),
            Some("Okay, let me know what you think about the requirements.")
        );
    }

    #[test]
    fn pending_rejects_text_messages() {
        let mut n = Negotiation::new(Role::Requester);
        let id = n.send_text(Role::Requester, "hello").unwrap().id().to_string();
        assert!(matches!(n.pending(&id), Err(CoreError::InvalidTransition { .. })));
    }
}
