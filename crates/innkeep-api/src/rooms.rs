//! Handlers for `/rooms` endpoints — the room registry.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/rooms` | Optional `?status=available\|occupied\|cleaning\|maintenance` |
//! | `POST`  | `/rooms` | Body: a new room record |
//! | `GET`   | `/rooms/:id` | 404 if not found |
//! | `PATCH` | `/rooms/:id` | Partial update merged into the record |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use innkeep_core::{
  Error, FrontDesk,
  room::{NewRoom, Room, RoomPatch, RoomStatus},
  store::PropertyStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status: Option<RoomStatus>,
}

/// `GET /rooms[?status=<status>]`
pub async fn list<S: PropertyStore>(
  State(desk): State<Arc<FrontDesk<S>>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Room>>, ApiError> {
  Ok(Json(desk.rooms(params.status).await?))
}

/// `POST /rooms`
pub async fn create<S: PropertyStore>(
  State(desk): State<Arc<FrontDesk<S>>>,
  Json(body): Json<NewRoom>,
) -> Result<impl IntoResponse, ApiError> {
  let room = desk.add_room(body).await?;
  tracing::info!(room_id = %room.room_id, number = %room.number, "room created");
  Ok((StatusCode::CREATED, Json(room)))
}

/// `GET /rooms/:id`
pub async fn get_one<S: PropertyStore>(
  State(desk): State<Arc<FrontDesk<S>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Room>, ApiError> {
  let room = desk.room(id).await?.ok_or(Error::RoomNotFound(id))?;
  Ok(Json(room))
}

/// `PATCH /rooms/:id` — staff edit, including the housekeeping status
/// override.
pub async fn update<S: PropertyStore>(
  State(desk): State<Arc<FrontDesk<S>>>,
  Path(id): Path<Uuid>,
  Json(patch): Json<RoomPatch>,
) -> Result<Json<Room>, ApiError> {
  let room = desk.update_room(id, patch).await?;
  tracing::info!(room_id = %id, status = ?room.status, "room updated");
  Ok(Json(room))
}
