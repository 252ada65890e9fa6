//! Handlers for `/invoices` endpoints — billing and settlement.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/invoices` | All invoices |
//! | `DELETE` | `/invoices` | Bulk purge (registry reset) |
//! | `GET`    | `/invoices/:id` | 404 if not found |
//! | `DELETE` | `/invoices/:id` | Delete one invoice |
//! | `POST`   | `/invoices/:id/settle` | Mark fully paid |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use innkeep_core::{
  Error, FrontDesk, invoice::Invoice, store::PropertyStore,
};
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;

/// `GET /invoices`
pub async fn list<S: PropertyStore>(
  State(desk): State<Arc<FrontDesk<S>>>,
) -> Result<Json<Vec<Invoice>>, ApiError> {
  Ok(Json(desk.invoices().await?))
}

/// `GET /invoices/:id`
pub async fn get_one<S: PropertyStore>(
  State(desk): State<Arc<FrontDesk<S>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Invoice>, ApiError> {
  let invoice = desk.invoice(id).await?.ok_or(Error::InvoiceNotFound(id))?;
  Ok(Json(invoice))
}

/// `POST /invoices/:id/settle`
pub async fn settle<S: PropertyStore>(
  State(desk): State<Arc<FrontDesk<S>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Invoice>, ApiError> {
  let invoice = desk.settle_invoice(id).await?;
  tracing::info!(
    invoice_id = %id,
    amount_paid = %invoice.amount_paid,
    "invoice settled",
  );
  Ok(Json(invoice))
}

/// `DELETE /invoices/:id`
pub async fn remove<S: PropertyStore>(
  State(desk): State<Arc<FrontDesk<S>>>,
  Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
  desk.delete_invoice(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /invoices` — bulk purge; stay history is untouched.
pub async fn purge<S: PropertyStore>(
  State(desk): State<Arc<FrontDesk<S>>>,
) -> Result<impl IntoResponse, ApiError> {
  let purged = desk.purge_invoices().await?;
  tracing::info!(purged, "invoice registry purged");
  Ok(Json(json!({ "purged": purged })))
}
