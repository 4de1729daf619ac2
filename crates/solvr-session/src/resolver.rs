//! Who answers a pending proposal.
//!
//! The lifecycle manager never decides an outcome itself. A
//! [`ProposalResolver`] is injected instead:
//!
//! - [`SimulatedResolver`] plays a counterparty with fixed delays and a coin flip.
//! - [`ScriptedResolver`] replays queued outcomes immediately, for tests.
//! - [`ChannelResolver`] waits for decisions pushed by a real counterparty.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use solvr_config::NegotiationConfig;
use solvr_core::CoreError;
use solvr_core::enums::{Outcome, Role};
use tokio::sync::mpsc;

/// Read-only view of the proposal being resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingProposal {
    pub id: String,
    pub price: f64,
    pub sender: Role,
}

impl PendingProposal {
    /// The side expected to answer.
    #[must_use]
    pub const fn responder(&self) -> Role {
        self.sender.counterparty()
    }
}

/// An outcome plus the text the responder says alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverDecision {
    pub outcome: Outcome,
    pub text: String,
}

impl ResolverDecision {
    #[must_use]
    pub fn new(outcome: Outcome, text: impl Into<String>) -> Self {
        Self {
            outcome,
            text: text.into(),
        }
    }

    /// Decision carrying the stock line for `responder`.
    #[must_use]
    pub fn narrated(responder: Role, outcome: Outcome) -> Self {
        Self::new(outcome, narrative(responder, outcome))
    }
}

/// Stock line spoken by `responder` when answering a proposal.
#[must_use]
pub const fn narrative(responder: Role, outcome: Outcome) -> &'static str {
    match (responder, outcome) {
        (Role::Provider, Outcome::Accepted) => "That price works for me. I've accepted your offer!",
        (Role::Provider, Outcome::Rejected) => {
            "I think that's a bit low given the requirements. Can we do better?"
        }
        (Role::Requester, Outcome::Accepted) => "That looks fair. I accept your offer!",
        (Role::Requester, Outcome::Rejected) => {
            "That's a bit higher than my budget. Can you come down a bit?"
        }
    }
}

/// Opening line from `speaker` when a negotiation starts.
#[must_use]
pub const fn greeting(speaker: Role) -> &'static str {
    match speaker {
        Role::Provider => "Hi! I saw your project brief. I'm interested in working on this.",
        Role::Requester => "Hello! I reviewed your profile and I'd like to hire you for my project.",
    }
}

/// Stock answer from `responder` to a plain chat message.
#[must_use]
pub const fn canned_reply(responder: Role) -> &'static str {
    match responder {
        Role::Provider => "Sounds good. Let's discuss the details.",
        Role::Requester => "Okay, let me know what you think about the requirements.",
    }
}

#[async_trait]
pub trait ProposalResolver: Send + Sync {
    /// Wait for the counterparty's answer to `proposal`.
    ///
    /// # Errors
    ///
    /// Implementation specific; the proposal stays pending on error.
    async fn resolve(&self, proposal: &PendingProposal) -> Result<ResolverDecision, CoreError>;

    /// Optional answer to a plain text message. `None` means no reply.
    ///
    /// # Errors
    ///
    /// Implementation specific.
    async fn reply_to_text(&self, _responder: Role, _text: &str) -> Result<Option<String>, CoreError> {
        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// Simulated
// ---------------------------------------------------------------------------

/// Stand-in counterparty: waits, "thinks", then accepts or rejects with
/// equal probability drawn from OS entropy.
#[derive(Debug, Clone)]
pub struct SimulatedResolver {
    initial_delay: Duration,
    thinking_delay: Duration,
}

impl SimulatedResolver {
    #[must_use]
    pub const fn new(initial_delay: Duration, thinking_delay: Duration) -> Self {
        Self {
            initial_delay,
            thinking_delay,
        }
    }

    #[must_use]
    pub const fn from_config(config: &NegotiationConfig) -> Self {
        Self::new(
            Duration::from_millis(config.initial_delay_ms),
            Duration::from_millis(config.thinking_delay_ms),
        )
    }

    fn coin_flip() -> Result<Outcome, CoreError> {
        Self::flip_with(getrandom::fill)
    }

    fn flip_with(
        fill: impl FnOnce(&mut [u8]) -> Result<(), getrandom::Error>,
    ) -> Result<Outcome, CoreError> {
        let mut byte = [0u8; 1];
        fill(&mut byte).map_err(|e| CoreError::Entropy(e.to_string()))?;
        Ok(if byte[0] & 1 == 1 {
            Outcome::Accepted
        } else {
            Outcome::Rejected
        })
    }
}

impl Default for SimulatedResolver {
    fn default() -> Self {
        Self::from_config(&NegotiationConfig::default())
    }
}

#[async_trait]
impl ProposalResolver for SimulatedResolver {
    async fn resolve(&self, proposal: &PendingProposal) -> Result<ResolverDecision, CoreError> {
        tokio::time::sleep(self.initial_delay).await;
        tracing::debug!(id = %proposal.id, "counterparty is typing");
        tokio::time::sleep(self.thinking_delay).await;
        let outcome = Self::coin_flip()?;
        Ok(ResolverDecision::narrated(proposal.responder(), outcome))
    }

    async fn reply_to_text(&self, responder: Role, _text: &str) -> Result<Option<String>, CoreError> {
        tokio::time::sleep(self.thinking_delay).await;
        Ok(Some(canned_reply(responder).to_string()))
    }
}

// ---------------------------------------------------------------------------
// Scripted
// ---------------------------------------------------------------------------

/// Replays queued outcomes without delay and records what it was asked.
#[derive(Debug, Default)]
pub struct ScriptedResolver {
    outcomes: Mutex<VecDeque<Outcome>>,
    seen: Mutex<Vec<PendingProposal>>,
}

impl ScriptedResolver {
    #[must_use]
    pub fn new(outcomes: impl IntoIterator<Item = Outcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Proposals passed to [`resolve`](ProposalResolver::resolve), in call order.
    #[must_use]
    pub fn seen(&self) -> Vec<PendingProposal> {
        self.seen
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ProposalResolver for ScriptedResolver {
    async fn resolve(&self, proposal: &PendingProposal) -> Result<ResolverDecision, CoreError> {
        self.seen
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(proposal.clone());
        let outcome = self
            .outcomes
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .pop_front()
            .ok_or_else(|| CoreError::Validation("scripted resolver has no outcomes left".into()))?;
        Ok(ResolverDecision::narrated(proposal.responder(), outcome))
    }
}

// ---------------------------------------------------------------------------
// Channel
// ---------------------------------------------------------------------------

/// Resolver fed by a real counterparty through an mpsc channel.
///
/// Decisions are consumed in the order they are sent.
#[derive(Debug)]
pub struct ChannelResolver {
    decisions: tokio::sync::Mutex<mpsc::Receiver<ResolverDecision>>,
}

/// Sending half handed to whatever relays the counterparty's answers.
#[derive(Debug, Clone)]
pub struct DecisionSender {
    tx: mpsc::Sender<ResolverDecision>,
}

impl ChannelResolver {
    /// A resolver and its sender, buffering up to `capacity` decisions.
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, DecisionSender) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            Self {
                decisions: tokio::sync::Mutex::new(rx),
            },
            DecisionSender { tx },
        )
    }
}

impl DecisionSender {
    /// # Errors
    ///
    /// [`CoreError::RemoteFailure`] if the resolver has been dropped.
    pub async fn send(&self, decision: ResolverDecision) -> Result<(), CoreError> {
        self.tx
            .send(decision)
            .await
            .map_err(|_| CoreError::RemoteFailure("negotiation session has ended".into()))
    }
}

#[async_trait]
impl ProposalResolver for ChannelResolver {
    async fn resolve(&self, proposal: &PendingProposal) -> Result<ResolverDecision, CoreError> {
        let mut decisions = self.decisions.lock().await;
        tracing::debug!(id = %proposal.id, "waiting for counterparty decision");
        decisions
            .recv()
            .await
            .ok_or_else(|| CoreError::RemoteFailure("counterparty disconnected".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn coin_flip_reads_the_low_bit() {
        let flip = |value: u8| {
            SimulatedResolver::flip_with(|buf| {
                buf[0] = value;
                Ok(())
            })
            .unwrap()
        };
        assert_eq!(flip(3), Outcome::Accepted);
        assert_eq!(flip(2), Outcome::Rejected);
    }

    #[test]
    fn entropy_failure_has_its_own_error() {
        let err = SimulatedResolver::flip_with(|_| Err(getrandom::Error::UNSUPPORTED)).unwrap_err();
        assert!(matches!(err, CoreError::Entropy(_)), "{err}");
    }

    fn proposal(sender: Role) -> PendingProposal {
        PendingProposal {
            id: "msg-000001".into(),
            price: 250.0,
            sender,
        }
    }

    #[rstest]
    #[case(Role::Requester, Outcome::Accepted, "That price works for me. I've accepted your offer!")]
    #[case(Role::Requester, Outcome::Rejected, "I think that's a bit low given the requirements. Can we do better?")]
    #[case(Role::Provider, Outcome::Accepted, "That looks fair. I accept your offer!")]
    #[case(Role::Provider, Outcome::Rejected, "That's a bit higher than my budget. Can you come down a bit?")]
    fn narration_follows_responder(
        #[case] sender: Role,
        #[case] outcome: Outcome,
        #[case] expected: &str,
    ) {
        let decision = ResolverDecision::narrated(proposal(sender).responder(), outcome);
        assert_eq!(decision.text, expected);
        assert_eq!(decision.outcome, outcome);
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_waits_initial_plus_thinking_delay() {
        let resolver = SimulatedResolver::default();
        let start = tokio::time::Instant::now();
        let decision = resolver.resolve(&proposal(Role::Requester)).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(2_500));
        assert!(
            decision.text == narrative(Role::Provider, Outcome::Accepted)
                || decision.text == narrative(Role::Provider, Outcome::Rejected)
        );
        assert_eq!(
            decision.text,
            narrative(Role::Provider, decision.outcome),
            "text must match the drawn outcome"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_text_reply_after_thinking_delay() {
        let resolver = SimulatedResolver::new(Duration::from_millis(500), Duration::from_secs(2));
        let start = tokio::time::Instant::now();
        let reply = resolver.reply_to_text(Role::Requester, "hello").await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(2));
        assert_eq!(reply.as_deref(), Some(canned_reply(Role::Requester)));
    }

    #[tokio::test]
    async fn scripted_replays_in_order_then_errors() {
        let resolver = ScriptedResolver::new([Outcome::Rejected, Outcome::Accepted]);
        let first = resolver.resolve(&proposal(Role::Provider)).await.unwrap();
        let second = resolver.resolve(&proposal(Role::Provider)).await.unwrap();
        assert_eq!(first.outcome, Outcome::Rejected);
        assert_eq!(second.outcome, Outcome::Accepted);
        assert!(resolver.resolve(&proposal(Role::Provider)).await.is_err());
        assert_eq!(resolver.seen().len(), 3);
    }

    #[tokio::test]
    async fn scripted_has_no_text_reply() {
        let resolver = ScriptedResolver::default();
        assert_eq!(resolver.reply_to_text(Role::Provider, "hi").await.unwrap(), None);
    }

    #[tokio::test]
    async fn channel_delivers_sent_decisions() {
        let (resolver, sender) = ChannelResolver::channel(4);
        sender
            .send(ResolverDecision::new(Outcome::Accepted, "deal"))
            .await
            .unwrap();
        let decision = resolver.resolve(&proposal(Role::Requester)).await.unwrap();
        assert_eq!(decision, ResolverDecision::new(Outcome::Accepted, "deal"));
    }

    #[tokio::test]
    async fn channel_reports_disconnect() {
        let (resolver, sender) = ChannelResolver::channel(1);
        drop(sender);
        let err = resolver.resolve(&proposal(Role::Requester)).await.unwrap_err();
        assert!(matches!(err, CoreError::RemoteFailure(_)));
    }
}
