//! HTTP API handlers.

use std::sync::Arc;

use axum::async_trait;
use axum::extract::{FromRequest, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::checkout::{CheckoutProvider, CheckoutRequest};
use crate::config::Config;
use crate::error::ServerError;
use crate::metrics;
use crate::stats::{compute_stats, Stats};
use crate::store::{Ticket, TicketDraft, TicketStore, NO_VENDEUR};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Ticket store.
    pub store: Arc<TicketStore>,
    /// Payment provider (real client or simulation stub).
    pub checkout: Arc<dyn CheckoutProvider>,
    /// Origin used when the request carries no Origin header.
    pub default_origin: String,
    /// Per-ticket price used when a payment carries no amount.
    pub default_ticket_price: Decimal,
    /// Password gating the admin import endpoint.
    pub admin_password: Option<String>,
}

impl AppState {
    /// Assemble app state from config and the injected collaborators.
    pub fn new(
        config: &Config,
        store: Arc<TicketStore>,
        checkout: Arc<dyn CheckoutProvider>,
    ) -> Self {
        Self {
            store,
            checkout,
            default_origin: config.default_origin.clone(),
            default_ticket_price: config.ticket_price,
            admin_password: config.admin_password.clone(),
        }
    }
}

/// Handler-level error mapped onto an HTTP response.
#[derive(Debug)]
pub enum ApiError {
    /// Internal failure, logged and surfaced as 500.
    Internal(ServerError),
    /// Rejected admin access, surfaced as 403.
    Forbidden(&'static str),
    /// Unparseable request body, surfaced as 500 `{error}` like any other
    /// handler failure.
    Malformed(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Error message.
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Internal(err) => {
                error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        error: err.to_string(),
                    }),
                )
                    .into_response()
            }
            Self::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                Json(ErrorBody {
                    error: msg.to_string(),
                }),
            )
                .into_response(),
            Self::Malformed(msg) => {
                warn!(error = %msg, "malformed request body");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody { error: msg }),
                )
                    .into_response()
            }
        }
    }
}

/// `Json` extractor whose rejection flows through [`ApiError`], keeping the
/// 500 `{error}` contract for bodies that fail to parse.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::Malformed(rejection.body_text())),
        }
    }
}

impl<E> From<E> for ApiError
where
    ServerError: From<E>,
{
    fn from(err: E) -> Self {
        Self::Internal(ServerError::from(err))
    }
}

/// Checkout session response.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    /// Redirect URL for the buyer.
    pub url: String,
}

/// Completed-payment notification.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePaymentRequest {
    /// Buyer first name.
    pub first_name: String,
    /// Buyer last name.
    pub last_name: String,
    /// Buyer email.
    pub email: String,
    /// Buyer phone number.
    pub phone: String,
    /// Number of tickets purchased.
    pub tickets: u32,
    /// Total purchase amount; per-ticket price defaults when absent.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Seller attribution label.
    #[serde(default)]
    pub vendeur: Option<String>,
}

/// Saved-payment response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePaymentResponse {
    /// Always true on the success path.
    pub success: bool,
    /// Ticket numbers assigned to this purchase.
    pub ticket_numbers: Vec<u64>,
}

/// Admin import request: replaces the entire store.
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    /// Admin password.
    pub password: String,
    /// Replacement ticket rows.
    pub payments: Vec<Ticket>,
}

/// Admin import response.
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    /// Always true on the success path.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
}

/// `POST /create-checkout-session` - create a provider checkout session (or a
/// simulated one) and return its redirect URL.
pub async fn create_checkout_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(request): ApiJson<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let origin = headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(&state.default_origin);

    info!(
        tickets = request.tickets,
        amount = %request.amount,
        email = %request.email,
        "checkout session requested"
    );

    let session = state
        .checkout
        .create_session(&request, origin)
        .await
        .map_err(|e| {
            metrics::inc_checkout_failed();
            ServerError::from(e)
        })?;

    if state.checkout.is_simulation() {
        metrics::inc_checkout_simulated();
    } else {
        metrics::inc_checkout_created();
    }

    Ok(Json(CheckoutResponse { url: session.url }))
}

/// `POST /save-payment` - append one ticket row per purchased ticket and
/// return the assigned numbers.
pub async fn save_payment(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SavePaymentRequest>,
) -> Result<Json<SavePaymentResponse>, ApiError> {
    let vendeur = request
        .vendeur
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| NO_VENDEUR.to_string());

    // The request carries the purchase total; rows store the per-ticket
    // price, rounded to cents so uneven totals cannot leave repeating
    // decimals in the store.
    let amount = match request.amount {
        Some(total) if request.tickets > 0 => {
            (total / Decimal::from(request.tickets)).round_dp(2)
        }
        _ => state.default_ticket_price,
    };

    let draft = TicketDraft {
        first_name: request.first_name,
        last_name: request.last_name,
        email: request.email,
        phone: request.phone,
        vendeur,
        amount,
    };

    let ticket_numbers = state.store.append(&draft, request.tickets).await?;

    metrics::inc_payments_saved();
    metrics::inc_tickets_issued(ticket_numbers.len() as u64);
    info!(
        vendeur = %draft.vendeur,
        tickets = ticket_numbers.len(),
        "payment saved"
    );

    Ok(Json(SavePaymentResponse {
        success: true,
        ticket_numbers,
    }))
}

/// `GET /admin/payments` - the stored ticket sequence, unmodified.
pub async fn admin_payments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Ticket>>, ApiError> {
    Ok(Json(state.store.list().await?))
}

/// `GET /admin/stats` - totals and per-seller revenue aggregates.
pub async fn admin_stats(State(state): State<AppState>) -> Result<Json<Stats>, ApiError> {
    let tickets = state.store.list().await?;
    Ok(Json(compute_stats(&tickets)))
}

/// `POST /admin/import` - password-gated wholesale replacement of the store.
pub async fn admin_import(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ImportRequest>,
) -> Result<Json<ImportResponse>, ApiError> {
    let expected = state
        .admin_password
        .as_deref()
        .ok_or(ApiError::Forbidden("admin import is disabled"))?;
    if request.password != expected {
        return Err(ApiError::Forbidden("invalid password"));
    }

    let count = state.store.replace_all(request.payments).await?;
    info!(count, "payments imported");

    Ok(Json(ImportResponse {
        success: true,
        message: format!("{count} payments imported"),
    }))
}
