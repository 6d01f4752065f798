//! Team API endpoints
//!
//! Covers the team registry, the member roster and the invitation workflow.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::membership::{Invitation, InvitationId, Membership};
use crate::domain::team::{Team, TeamId};
use crate::infrastructure::membership::{InviteRequest, MemberView};
use crate::infrastructure::team::CreateTeamRequest;

/// Create the teams router
pub fn create_teams_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_team))
        .route("/my-teams", get(my_teams))
        .route("/member-of", get(member_of))
        .route("/{team_id}", get(get_team).delete(delete_team))
        .route("/{team_id}/invite", post(invite))
        .route("/{team_id}/members", get(list_members))
        .route(
            "/{team_id}/invitations/{invitation_id}/accept",
            post(accept_invitation),
        )
}

/// Request to create a team
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTeamApiRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Request to invite a contact
#[derive(Debug, Clone, Deserialize)]
pub struct InviteApiRequest {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

/// Team response
#[derive(Debug, Clone, Serialize)]
pub struct TeamResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub owner_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Team> for TeamResponse {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id().as_str().to_string(),
            name: team.name().to_string(),
            description: team.description().map(String::from),
            owner_id: team.owner_id().as_str().to_string(),
            created_at: team.created_at().to_rfc3339(),
            updated_at: team.updated_at().to_rfc3339(),
        }
    }
}

/// List teams response
#[derive(Debug, Clone, Serialize)]
pub struct ListTeamsResponse {
    pub teams: Vec<TeamResponse>,
    pub total: usize,
}

impl ListTeamsResponse {
    fn from_teams(teams: &[Team]) -> Self {
        let teams: Vec<TeamResponse> = teams.iter().map(TeamResponse::from).collect();
        let total = teams.len();
        Self { teams, total }
    }
}

/// Invitation response
#[derive(Debug, Clone, Serialize)]
pub struct InvitationResponse {
    pub id: String,
    pub team_id: String,
    pub membership_id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub invited_by: String,
    pub created_at: String,
}

impl From<&Invitation> for InvitationResponse {
    fn from(invitation: &Invitation) -> Self {
        Self {
            id: invitation.id().as_str().to_string(),
            team_id: invitation.team_id().as_str().to_string(),
            membership_id: invitation.membership_id().as_str().to_string(),
            email: invitation.email().to_string(),
            name: invitation.contact().name.clone(),
            invited_by: invitation.invited_by().as_str().to_string(),
            created_at: invitation.created_at().to_rfc3339(),
        }
    }
}

/// Membership response
#[derive(Debug, Clone, Serialize)]
pub struct MembershipResponse {
    pub id: String,
    pub team_id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_at: Option<String>,
}

impl From<&Membership> for MembershipResponse {
    fn from(membership: &Membership) -> Self {
        Self {
            id: membership.id().as_str().to_string(),
            team_id: membership.team_id().as_str().to_string(),
            status: membership.status().to_string(),
            user_id: membership.user_id().map(|u| u.as_str().to_string()),
            email: membership.email().to_string(),
            accepted_at: membership.accepted_at().map(|t| t.to_rfc3339()),
        }
    }
}

/// Member roster response
#[derive(Debug, Serialize)]
pub struct ListMembersResponse {
    pub members: Vec<MemberView>,
    pub total: usize,
}

/// POST /teams/
pub async fn create_team(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<CreateTeamApiRequest>,
) -> Result<Json<TeamResponse>, ApiError> {
    debug!(name = %request.name, "Creating team");

    let team = state
        .team_service
        .create(
            user.id().clone(),
            CreateTeamRequest {
                name: request.name,
                description: request.description,
            },
        )
        .await?;

    Ok(Json(TeamResponse::from(&team)))
}

/// GET /teams/my-teams
pub async fn my_teams(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<ListTeamsResponse>, ApiError> {
    let teams = state.team_service.list_owned(user.id()).await?;

    Ok(Json(ListTeamsResponse::from_teams(&teams)))
}

/// GET /teams/member-of
pub async fn member_of(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<ListTeamsResponse>, ApiError> {
    let teams = state.team_service.list_member_of(user.id()).await?;

    Ok(Json(ListTeamsResponse::from_teams(&teams)))
}

/// GET /teams/{team_id}
pub async fn get_team(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(team_id): Path<String>,
) -> Result<Json<TeamResponse>, ApiError> {
    let team = state
        .team_service
        .get_for_actor(&TeamId::new(team_id), user.id())
        .await?;

    Ok(Json(TeamResponse::from(&team)))
}

/// DELETE /teams/{team_id}
pub async fn delete_team(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(team_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    debug!(team_id = %team_id, "Deleting team");

    state
        .team_service
        .delete(&TeamId::new(team_id), user.id())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /teams/{team_id}/invite
pub async fn invite(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(team_id): Path<String>,
    Json(request): Json<InviteApiRequest>,
) -> Result<Json<InvitationResponse>, ApiError> {
    debug!(team_id = %team_id, email = %request.email, "Inviting contact");

    let invitation = state
        .invitation_workflow
        .invite(
            &TeamId::new(team_id),
            user.id(),
            InviteRequest {
                email: request.email,
                name: request.name,
                nickname: request.nickname,
                phone_number: request.phone_number,
                country_code: request.country_code,
            },
        )
        .await?;

    Ok(Json(InvitationResponse::from(&invitation)))
}

/// GET /teams/{team_id}/members
pub async fn list_members(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(team_id): Path<String>,
) -> Result<Json<ListMembersResponse>, ApiError> {
    let members = state
        .membership_service
        .list_members(&TeamId::new(team_id), user.id())
        .await?;

    let total = members.len();

    Ok(Json(ListMembersResponse { members, total }))
}

/// POST /teams/{team_id}/invitations/{invitation_id}/accept
pub async fn accept_invitation(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path((team_id, invitation_id)): Path<(String, String)>,
) -> Result<Json<MembershipResponse>, ApiError> {
    debug!(team_id = %team_id, invitation_id = %invitation_id, "Accepting invitation");

    let membership = state
        .invitation_workflow
        .accept(
            &TeamId::new(team_id),
            &InvitationId::new(invitation_id),
            &user,
        )
        .await?;

    Ok(Json(MembershipResponse::from(&membership)))
}
