//! JSON REST API for Innkeep.
//!
//! Exposes an axum [`Router`] backed by any
//! [`innkeep_core::store::PropertyStore`], with every lifecycle mutation
//! routed through the front desk. Auth, TLS, and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", innkeep_api::api_router(desk.clone()))
//! ```

pub mod error;
pub mod invoices;
pub mod reservations;
pub mod rooms;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use innkeep_core::{FrontDesk, store::PropertyStore};

pub use error::ApiError;

/// Build a fully-materialised API router for `desk`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(desk: Arc<FrontDesk<S>>) -> Router<()>
where
  S: PropertyStore + 'static,
{
  Router::new()
    // Rooms
    .route("/rooms", get(rooms::list::<S>).post(rooms::create::<S>))
    .route(
      "/rooms/{id}",
      get(rooms::get_one::<S>).patch(rooms::update::<S>),
    )
    // Reservations
    .route(
      "/reservations",
      get(reservations::list::<S>).post(reservations::book::<S>),
    )
    .route(
      "/reservations/{id}",
      get(reservations::get_one::<S>)
        .patch(reservations::amend::<S>)
        .delete(reservations::remove::<S>),
    )
    .route("/reservations/{id}/check-in", post(reservations::check_in::<S>))
    .route("/reservations/{id}/check-out", post(reservations::check_out::<S>))
    .route("/reservations/{id}/cancel", post(reservations::cancel::<S>))
    .route("/reservations/{id}/charges", post(reservations::post_charge::<S>))
    // Invoices
    .route(
      "/invoices",
      get(invoices::list::<S>).delete(invoices::purge::<S>),
    )
    .route(
      "/invoices/{id}",
      get(invoices::get_one::<S>).delete(invoices::remove::<S>),
    )
    .route("/invoices/{id}/settle", post(invoices::settle::<S>))
    .with_state(desk)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use innkeep_core::FrontDesk;
  use innkeep_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::api_router;

  async fn desk() -> Arc<FrontDesk<SqliteStore>> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    Arc::new(FrontDesk::new(store))
  }

  async fn request(
    desk: Arc<FrontDesk<SqliteStore>>,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = api_router(desk)
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap();

    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  fn room_body() -> Value {
    json!({
      "number": "204",
      "room_type": "standard",
      "floor": 2,
      "capacity": 2,
      "nightly_rate": "100",
      "amenities": ["wifi"]
    })
  }

  fn booking_body(room_id: &str) -> Value {
    json!({
      "guest": { "name": "Alice", "email": "alice@example.com", "phone": null },
      "room_id": room_id,
      "check_in": "2024-01-01",
      "check_out": "2024-01-04",
      "guest_count": 2
    })
  }

  /// Create a room and a booking, returning (room_id, reservation_id).
  async fn seeded(desk: &Arc<FrontDesk<SqliteStore>>) -> (String, String) {
    let (status, room) =
      request(desk.clone(), "POST", "/rooms", Some(room_body())).await;
    assert_eq!(status, StatusCode::CREATED);
    let room_id = room["room_id"].as_str().unwrap().to_owned();

    let (status, res) = request(
      desk.clone(),
      "POST",
      "/reservations",
      Some(booking_body(&room_id)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let reservation_id = res["reservation_id"].as_str().unwrap().to_owned();

    (room_id, reservation_id)
  }

  #[tokio::test]
  async fn book_returns_201_with_priced_total() {
    let desk = desk().await;
    let (status, room) =
      request(desk.clone(), "POST", "/rooms", Some(room_body())).await;
    assert_eq!(status, StatusCode::CREATED);
    let room_id = room["room_id"].as_str().unwrap();

    let (status, res) = request(
      desk.clone(),
      "POST",
      "/reservations",
      Some(booking_body(room_id)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(res["status"], "confirmed");
    assert_eq!(res["total_amount"], "300");

    let (_, room) =
      request(desk, "GET", &format!("/rooms/{room_id}"), None).await;
    assert_eq!(room["status"], "occupied");
  }

  #[tokio::test]
  async fn book_without_guest_name_returns_400() {
    let desk = desk().await;
    let (_, room) =
      request(desk.clone(), "POST", "/rooms", Some(room_body())).await;
    let room_id = room["room_id"].as_str().unwrap();

    let mut body = booking_body(room_id);
    body["guest"]["name"] = json!("");
    let (status, err) =
      request(desk, "POST", "/reservations", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(err["error"].as_str().unwrap().contains("guest name"));
  }

  #[tokio::test]
  async fn check_in_issues_invoice_and_repeat_conflicts() {
    let desk = desk().await;
    let (_, reservation_id) = seeded(&desk).await;

    let uri = format!("/reservations/{reservation_id}/check-in");
    let (status, outcome) = request(desk.clone(), "POST", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["invoice_reused"], json!(false));
    assert_eq!(outcome["invoice"]["status"], "unpaid");
    assert_eq!(outcome["invoice"]["amount_due"], "300");

    let (status, _) = request(desk.clone(), "POST", &uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, invoices) = request(desk, "GET", "/invoices", None).await;
    assert_eq!(invoices.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn get_unknown_reservation_returns_404() {
    let desk = desk().await;
    let uri = format!("/reservations/{}", uuid::Uuid::new_v4());
    let (status, _) = request(desk, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn settle_marks_invoice_paid() {
    let desk = desk().await;
    let (_, reservation_id) = seeded(&desk).await;

    let uri = format!("/reservations/{reservation_id}/check-in");
    let (_, outcome) = request(desk.clone(), "POST", &uri, None).await;
    let invoice_id = outcome["invoice"]["invoice_id"].as_str().unwrap();

    let (status, settled) = request(
      desk,
      "POST",
      &format!("/invoices/{invoice_id}/settle"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settled["status"], "paid");
    assert_eq!(settled["amount_paid"], settled["amount_due"]);
  }

  #[tokio::test]
  async fn purge_reports_count() {
    let desk = desk().await;
    let (_, reservation_id) = seeded(&desk).await;
    let uri = format!("/reservations/{reservation_id}/check-in");
    request(desk.clone(), "POST", &uri, None).await;

    let (status, body) = request(desk, "DELETE", "/invoices", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["purged"], json!(1));
  }
}
