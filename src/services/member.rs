//! Member services - registration and member management

use crate::core::{AppError, AppState};
use crate::dtos::{CreateMemberDTO, MemberDTO, UpdateMemberDTO};
use crate::repositories::{Create, Read, Update};
use axum::extract::{Json, Path, State};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

#[instrument(skip(state, body), fields(name = %body.name))]
pub async fn register_member(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateMemberDTO>,
) -> Result<Json<MemberDTO>, AppError> {
    debug!("Registering member");
    body.validate()?;

    // member names are treated as unique
    let homonyms = state.member.find_by_name(&body.name).await?;
    if !homonyms.is_empty() {
        warn!("Member name already taken");
        return Err(AppError::conflict(
            "A member with this name already exists.",
        ));
    }

    let member = state.member.create(&body).await?;

    info!("Member '{}' registered", member.name);
    Ok(Json(MemberDTO::from(member)))
}

#[instrument(skip(state))]
pub async fn list_members(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MemberDTO>>, AppError> {
    let members = state.member.find_all().await?;

    let members_dto: Vec<MemberDTO> = members.into_iter().map(MemberDTO::from).collect();
    Ok(Json(members_dto))
}

#[instrument(skip(state), fields(member_id = %member_id))]
pub async fn get_member_by_id(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<i64>,
) -> Result<Json<Option<MemberDTO>>, AppError> {
    debug!("Fetching member by ID");
    let member = state.member.read(&member_id).await?;
    if member.is_none() {
        warn!("Member not found");
    }

    // an explicit None: the caller decides what a miss means
    Ok(Json(member.map(MemberDTO::from)))
}

#[instrument(skip(state, body), fields(member_id = %member_id))]
pub async fn update_member(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<i64>,
    Json(body): Json<UpdateMemberDTO>,
) -> Result<Json<MemberDTO>, AppError> {
    debug!("Updating member");
    body.validate()?;

    // RowNotFound surfaces as 404 through the AppError conversion
    let member = state.member.update(&member_id, &body).await?;

    info!("Member {} updated", member_id);
    Ok(Json(MemberDTO::from(member)))
}
