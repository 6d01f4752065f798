//! Shared application state

use std::sync::Arc;

use crate::infrastructure::auth::JwtGenerator;
use crate::infrastructure::membership::{InvitationWorkflow, MembershipService};
use crate::infrastructure::team::TeamService;
use crate::infrastructure::user::UserService;

/// Application state shared across all request handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub team_service: Arc<TeamService>,
    pub membership_service: Arc<MembershipService>,
    pub invitation_workflow: Arc<InvitationWorkflow>,
    pub jwt_service: Arc<dyn JwtGenerator>,
}
