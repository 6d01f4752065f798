//! Membership infrastructure - persistence, roster service and the
//! invitation workflow

mod postgres_repository;
mod repository;
mod service;
mod workflow;

pub use postgres_repository::PostgresMembershipRepository;
pub use repository::InMemoryMembershipRepository;
pub use service::{MemberView, MembershipService};
pub use workflow::{InvitationWorkflow, InviteRequest};
