//! Entity structs for all solvr domain objects.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` so wire
//! payloads can be checked against their generated schema in tests.

mod assignment;
mod brief;
mod message;
mod solver;

pub use assignment::{
    CreatedAssignment, DEFAULT_ASSIGNMENT_TITLE, DEFAULT_URGENCY, GeoPoint, OPEN_STATUS,
    SubmissionPayload, SubmissionSource,
};
pub use brief::{
    Brief, BriefDisplay, DEFAULT_CURRENCY, FLEXIBLE_LABEL, IRRELEVANT_TITLE, NEGOTIABLE_LABEL,
    PENDING_TITLE, ParsedBrief, UNTITLED_TITLE,
};
pub use message::Message;
pub use solver::{MatchedSolver, SolverProfile};
