//! Handlers for `/reservations` endpoints — the booking lifecycle.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/reservations` | Optional `?status=` filter |
//! | `POST`   | `/reservations` | Book: creates Confirmed + occupies room |
//! | `GET`    | `/reservations/:id` | 404 if not found |
//! | `PATCH`  | `/reservations/:id` | Amend room/dates while Confirmed |
//! | `DELETE` | `/reservations/:id` | Staff purge; releases a held room |
//! | `POST`   | `/reservations/:id/check-in` | 409 unless Confirmed |
//! | `POST`   | `/reservations/:id/check-out` | 409 unless CheckedIn |
//! | `POST`   | `/reservations/:id/cancel` | 409 unless Confirmed |
//! | `POST`   | `/reservations/:id/charges` | Post a service charge |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use innkeep_core::{
  Error, FrontDesk,
  front_desk::CheckIn,
  reservation::{
    AmendBooking, BookingRequest, Reservation, ReservationStatus,
  },
  store::PropertyStore,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status: Option<ReservationStatus>,
}

/// `GET /reservations[?status=<status>]`
pub async fn list<S: PropertyStore>(
  State(desk): State<Arc<FrontDesk<S>>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Reservation>>, ApiError> {
  Ok(Json(desk.reservations(params.status).await?))
}

/// `POST /reservations`
pub async fn book<S: PropertyStore>(
  State(desk): State<Arc<FrontDesk<S>>>,
  Json(body): Json<BookingRequest>,
) -> Result<impl IntoResponse, ApiError> {
  let reservation = desk.book(body).await?;
  tracing::info!(
    reservation_id = %reservation.reservation_id,
    room = %reservation.room.number,
    total = %reservation.total_amount,
    "reservation booked",
  );
  Ok((StatusCode::CREATED, Json(reservation)))
}

/// `GET /reservations/:id`
pub async fn get_one<S: PropertyStore>(
  State(desk): State<Arc<FrontDesk<S>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Reservation>, ApiError> {
  let reservation = desk
    .reservation(id)
    .await?
    .ok_or(Error::ReservationNotFound(id))?;
  Ok(Json(reservation))
}

/// `PATCH /reservations/:id`
pub async fn amend<S: PropertyStore>(
  State(desk): State<Arc<FrontDesk<S>>>,
  Path(id): Path<Uuid>,
  Json(body): Json<AmendBooking>,
) -> Result<Json<Reservation>, ApiError> {
  let reservation = desk.amend_booking(id, body).await?;
  tracing::info!(
    reservation_id = %id,
    total = %reservation.total_amount,
    "reservation amended",
  );
  Ok(Json(reservation))
}

/// `DELETE /reservations/:id`
pub async fn remove<S: PropertyStore>(
  State(desk): State<Arc<FrontDesk<S>>>,
  Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
  desk.delete_reservation(id).await?;
  tracing::info!(reservation_id = %id, "reservation deleted");
  Ok(StatusCode::NO_CONTENT)
}

// ─── Lifecycle transitions ────────────────────────────────────────────────────

/// `POST /reservations/:id/check-in`
pub async fn check_in<S: PropertyStore>(
  State(desk): State<Arc<FrontDesk<S>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<CheckIn>, ApiError> {
  let outcome = desk.check_in(id).await?;
  tracing::info!(
    reservation_id = %id,
    invoice_id = %outcome.invoice.invoice_id,
    invoice_reused = outcome.invoice_reused,
    "guest checked in",
  );
  Ok(Json(outcome))
}

/// `POST /reservations/:id/check-out`
pub async fn check_out<S: PropertyStore>(
  State(desk): State<Arc<FrontDesk<S>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Reservation>, ApiError> {
  let reservation = desk.check_out(id).await?;
  tracing::info!(reservation_id = %id, "guest checked out");
  Ok(Json(reservation))
}

/// `POST /reservations/:id/cancel`
pub async fn cancel<S: PropertyStore>(
  State(desk): State<Arc<FrontDesk<S>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Reservation>, ApiError> {
  let reservation = desk.cancel(id).await?;
  tracing::info!(reservation_id = %id, "reservation cancelled");
  Ok(Json(reservation))
}

// ─── Service charges ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChargeBody {
  pub description: String,
  pub amount:      Decimal,
}

/// `POST /reservations/:id/charges`
pub async fn post_charge<S: PropertyStore>(
  State(desk): State<Arc<FrontDesk<S>>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ChargeBody>,
) -> Result<Json<Reservation>, ApiError> {
  let reservation = desk.post_charge(id, &body.description, body.amount).await?;
  tracing::info!(
    reservation_id = %id,
    amount = %body.amount,
    "service charge posted",
  );
  Ok(Json(reservation))
}
