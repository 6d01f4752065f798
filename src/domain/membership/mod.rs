//! Membership domain - the membership ledger and invitation records

mod invitation;
#[allow(clippy::module_inception)]
mod membership;
mod repository;

pub use invitation::{Invitation, InvitationId};
pub use membership::{ContactDetails, Membership, MembershipId, MembershipStatus};
pub use repository::MembershipRepository;
