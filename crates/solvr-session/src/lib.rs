//! # solvr-session
//!
//! The interactive workflows of a solvr session:
//!
//! - [`negotiation`]: proposal lifecycle over an append-only message log.
//! - [`resolver`]: injectable counterparty strategies.
//! - [`brief_chat`]: NLP-backed brief builder.
//! - [`confirm`]: brief confirmation and location sharing.
//! - [`geo`]: bounded one-shot geolocation.
//!
//! Every async workflow takes a [`CancellationToken`](tokio_util::sync::CancellationToken)
//! and checks it before mutating state, so results that arrive after the
//! session has moved on are dropped.

pub mod brief_chat;
pub mod cancel;
pub mod confirm;
pub mod geo;
pub mod negotiation;
pub mod resolver;
pub mod transcript;

pub use brief_chat::BriefChat;
pub use confirm::{ConfirmOutcome, ConfirmationWorkflow, LocationShare, share_location};
pub use geo::{GeoError, GeoOptions, GeolocationProvider};
pub use negotiation::Negotiation;
pub use resolver::{
    ChannelResolver, DecisionSender, PendingProposal, ProposalResolver, ResolverDecision,
    ScriptedResolver, SimulatedResolver,
};
pub use transcript::{ChatLine, Speaker};
