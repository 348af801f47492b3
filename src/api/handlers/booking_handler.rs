//! Booking handlers. Every route requires a session.

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{parse_booking_id, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{BookingRequest, BookingResponse, BookingStatus, LineRequest};
use crate::errors::{AppError, AppResult};
use crate::types::{ApiResponse, Created};

/// One requested line of a booking
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingLineInput {
    #[schema(example = "6f1c2d3e-0000-4000-8000-000000000001")]
    pub service_id: String,
    #[schema(example = 2, minimum = 1, maximum = 100)]
    pub quantity: i32,
}

/// Booking creation request.
///
/// Missing text fields deserialize as empty so the booking rules report them
/// by name.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[serde(default)]
    pub services: Vec<BookingLineInput>,
    #[serde(default)]
    #[schema(example = "12 MG Road, Pune")]
    pub address: String,
    #[serde(default)]
    #[schema(example = "2026-11-02")]
    pub date: String,
    #[serde(default)]
    #[schema(example = "10:00 AM - 12:00 PM")]
    pub time: String,
    #[serde(default)]
    #[schema(example = "9876543210")]
    pub mobile: String,
    pub instructions: Option<String>,
}

impl CreateBookingRequest {
    fn into_domain(self) -> AppResult<BookingRequest> {
        let lines = self
            .services
            .into_iter()
            .map(|line| {
                // An id that cannot name a service resolves to nothing
                let service_id = Uuid::parse_str(line.service_id.trim()).map_err(|_| {
                    AppError::NotFound(format!("Service with ID {} not found", line.service_id))
                })?;
                Ok(LineRequest {
                    service_id,
                    quantity: line.quantity,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(BookingRequest {
            lines,
            address: self.address,
            date: self.date,
            time: self.time,
            mobile: self.mobile,
            instructions: self.instructions,
        })
    }
}

/// Generic status change request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: BookingStatus,
}

/// Completion request with the customer's rating.
///
/// The rating range is checked by the booking itself, after ownership.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CompleteBookingRequest {
    #[schema(example = 5, minimum = 1, maximum = 5)]
    pub rating: i16,
    #[schema(example = "Quick and tidy work")]
    pub review: Option<String>,
}

/// `{ "booking": ... }` payload
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingPayload {
    pub booking: BookingResponse,
}

/// `{ "bookings": [...] }` payload
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingListPayload {
    pub bookings: Vec<BookingResponse>,
}

/// Booking routes; mounted behind the auth middleware
pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_booking))
        .route("/user", get(list_user_bookings))
        .route("/:id", put(update_booking_status))
        .route("/:id/cancel", put(cancel_booking))
        .route("/:id/complete", put(complete_booking))
}

/// Create a booking for the caller
#[utoipa::path(
    post,
    path = "/booking",
    tag = "Bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = BookingPayload),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "A requested service does not exist")
    ),
    security(("session_cookie" = []))
)]
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateBookingRequest>,
) -> AppResult<Created<BookingPayload>> {
    let request = payload.into_domain()?;
    let booking = state.booking_service.create(current.id, request).await?;

    Ok(Created(ApiResponse::with_message(
        BookingPayload { booking },
        "Booking created successfully",
    )))
}

/// The caller's bookings, newest first
#[utoipa::path(
    get,
    path = "/booking/user",
    tag = "Bookings",
    responses(
        (status = 200, description = "Bookings", body = BookingListPayload),
        (status = 401, description = "Not authenticated")
    ),
    security(("session_cookie" = []))
)]
pub async fn list_user_bookings(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<ApiResponse<BookingListPayload>> {
    let bookings = state.booking_service.list_for_user(current.id).await?;
    Ok(ApiResponse::success(BookingListPayload { bookings }))
}

/// Set the status of an owned booking
#[utoipa::path(
    put,
    path = "/booking/{id}",
    tag = "Bookings",
    params(("id" = String, Path, description = "Booking ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = BookingPayload),
        (status = 400, description = "Invalid booking ID or status"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Booking belongs to another user"),
        (status = 404, description = "Booking not found")
    ),
    security(("session_cookie" = []))
)]
pub async fn update_booking_status(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateStatusRequest>,
) -> AppResult<ApiResponse<BookingPayload>> {
    let id = parse_booking_id(&id)?;
    let booking = state
        .booking_service
        .update_status(current.id, id, payload.status)
        .await?;

    Ok(ApiResponse::with_message(
        BookingPayload { booking },
        format!("Booking {} successfully", payload.status),
    ))
}

/// Cancel an owned booking
#[utoipa::path(
    put,
    path = "/booking/{id}/cancel",
    tag = "Bookings",
    params(("id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled", body = BookingPayload),
        (status = 400, description = "Invalid booking ID or booking already completed"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Booking belongs to another user"),
        (status = 404, description = "Booking not found")
    ),
    security(("session_cookie" = []))
)]
pub async fn cancel_booking(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<BookingPayload>> {
    let id = parse_booking_id(&id)?;
    let booking = state.booking_service.cancel(current.id, id).await?;

    Ok(ApiResponse::with_message(
        BookingPayload { booking },
        "Booking cancelled successfully",
    ))
}

/// Complete an owned booking with a rating and optional review
#[utoipa::path(
    put,
    path = "/booking/{id}/complete",
    tag = "Bookings",
    params(("id" = String, Path, description = "Booking ID")),
    request_body = CompleteBookingRequest,
    responses(
        (status = 200, description = "Booking completed", body = BookingPayload),
        (status = 400, description = "Invalid ID, rating out of range, or booking not confirmed or in-progress"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Booking belongs to another user"),
        (status = 404, description = "Booking not found")
    ),
    security(("session_cookie" = []))
)]
pub async fn complete_booking(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<CompleteBookingRequest>,
) -> AppResult<ApiResponse<BookingPayload>> {
    let id = parse_booking_id(&id)?;
    let booking = state
        .booking_service
        .complete(current.id, id, payload.rating, payload.review)
        .await?;

    Ok(ApiResponse::with_message(
        BookingPayload { booking },
        "Booking completed successfully",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_maps_lines_in_order() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let payload: CreateBookingRequest = serde_json::from_value(serde_json::json!({
            "services": [
                { "serviceId": first.to_string(), "quantity": 2 },
                { "serviceId": second.to_string(), "quantity": 1 }
            ],
            "address": "12 MG Road",
            "date": "2026-11-02",
            "time": "10:00 AM",
            "mobile": "9876543210"
        }))
        .unwrap();

        let request = payload.into_domain().unwrap();
        assert_eq!(request.lines.len(), 2);
        assert_eq!(request.lines[0].service_id, first);
        assert_eq!(request.lines[0].quantity, 2);
        assert_eq!(request.lines[1].service_id, second);
        assert_eq!(request.instructions, None);
    }

    #[test]
    fn test_missing_fields_reach_booking_rules() {
        let payload: CreateBookingRequest =
            serde_json::from_value(serde_json::json!({ "services": [] })).unwrap();
        let request = payload.into_domain().unwrap();

        assert!(matches!(
            request.validate(),
            Err(AppError::Validation(ref m)) if m == "Please add at least one service to your booking"
        ));
    }

    #[test]
    fn test_malformed_service_id_is_not_found() {
        let payload: CreateBookingRequest = serde_json::from_value(serde_json::json!({
            "services": [{ "serviceId": "abc", "quantity": 1 }]
        }))
        .unwrap();

        assert!(matches!(
            payload.into_domain(),
            Err(AppError::NotFound(ref m)) if m == "Service with ID abc not found"
        ));
    }

    #[test]
    fn test_complete_request_leaves_rating_range_to_booking() {
        let payload: CompleteBookingRequest =
            serde_json::from_value(serde_json::json!({ "rating": 9 })).unwrap();
        assert!(payload.validate().is_ok());
        assert_eq!(payload.rating, 9);
    }

    #[test]
    fn test_status_request_uses_wire_names() {
        let payload: UpdateStatusRequest =
            serde_json::from_value(serde_json::json!({ "status": "in-progress" })).unwrap();
        assert_eq!(payload.status, BookingStatus::InProgress);
    }
}
