//! Booking aggregate: price snapshots, totals and the status state machine.
//!
//! ```text
//! any status      --(update)----> any status
//! confirmed,
//! in-progress     --(complete)--> completed
//! not completed   --(cancel)----> cancelled
//! ```
//!
//! Only the owner may move a booking. Totals are computed once, at creation,
//! from the unit prices captured at that moment.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::catalog::{Service, ServiceSummary};
use crate::config::{
    MAX_BOOKING_RATING, MAX_LINE_QUANTITY, MAX_MONEY_AMOUNT, MIN_BOOKING_RATING,
};
use crate::errors::{AppError, AppResult};

/// Exactly ten ASCII digits.
pub static MOBILE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("mobile pattern is valid"));

/// Lifecycle stage of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::InProgress => "in-progress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Whether `complete` may be applied from this status.
    pub fn can_complete(&self) -> bool {
        matches!(self, BookingStatus::Confirmed | BookingStatus::InProgress)
    }

    /// Whether `cancel` may be applied from this status.
    pub fn can_cancel(&self) -> bool {
        !matches!(self, BookingStatus::Completed)
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "in-progress" => Ok(BookingStatus::InProgress),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(AppError::validation(format!("Invalid booking status '{}'", other))),
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment state. Recorded but never advanced by any operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            "refunded" => Ok(PaymentStatus::Refunded),
            other => Err(AppError::validation(format!("Invalid payment status '{}'", other))),
        }
    }
}

/// One line of a booking: a service, how many, and its unit price at booking time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingItem {
    pub service_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
}

impl BookingItem {
    fn subtotal(&self) -> AppResult<Decimal> {
        self.price
            .checked_mul(Decimal::from(self.quantity))
            .ok_or_else(|| AppError::validation("Booking total is out of range"))
    }
}

/// Booking aggregate as stored
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<BookingItem>,
    pub total_amount: Decimal,
    pub address: String,
    pub date: String,
    pub time: String,
    pub mobile: String,
    pub instructions: String,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub rating: Option<i16>,
    pub review: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Reject callers other than the owner.
    ///
    /// `action` completes the message "Not authorized to {action} this booking".
    pub fn ensure_owned_by(&self, caller: Uuid, action: &str) -> AppResult<()> {
        if self.user_id != caller {
            return Err(AppError::forbidden(format!(
                "Not authorized to {} this booking",
                action
            )));
        }
        Ok(())
    }

    /// Overwrite the status without any transition check.
    pub fn set_status(&mut self, status: BookingStatus) {
        self.status = status;
    }

    /// Move to `cancelled` unless already completed.
    pub fn cancel(&mut self) -> AppResult<()> {
        if !self.status.can_cancel() {
            return Err(AppError::invalid_state("Cannot cancel a completed booking"));
        }
        self.status = BookingStatus::Cancelled;
        Ok(())
    }

    /// Move a confirmed or in-progress booking to `completed`, attaching the
    /// customer's rating and review.
    pub fn complete(&mut self, rating: i16, review: Option<String>) -> AppResult<()> {
        if !self.status.can_complete() {
            return Err(AppError::invalid_state(
                "Cannot complete a booking that is not confirmed or in-progress",
            ));
        }
        check_rating(rating)?;

        self.status = BookingStatus::Completed;
        self.rating = Some(rating);
        self.review = review;
        Ok(())
    }
}

fn check_rating(rating: i16) -> AppResult<()> {
    if !(MIN_BOOKING_RATING..=MAX_BOOKING_RATING).contains(&rating) {
        return Err(AppError::validation(format!(
            "Rating must be between {} and {}",
            MIN_BOOKING_RATING, MAX_BOOKING_RATING
        )));
    }
    Ok(())
}

/// Requested line before pricing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRequest {
    pub service_id: Uuid,
    pub quantity: i32,
}

/// Booking request after transport decoding, before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub lines: Vec<LineRequest>,
    pub address: String,
    pub date: String,
    pub time: String,
    pub mobile: String,
    pub instructions: Option<String>,
}

impl BookingRequest {
    /// Check every precondition that does not need the catalog.
    pub fn validate(&self) -> AppResult<()> {
        if self.lines.is_empty() {
            return Err(AppError::validation(
                "Please add at least one service to your booking",
            ));
        }
        if let Some(line) = self.lines.iter().find(|l| l.quantity < 1) {
            return Err(AppError::validation(format!(
                "Quantity for service {} must be at least 1",
                line.service_id
            )));
        }
        if let Some(line) = self.lines.iter().find(|l| l.quantity > MAX_LINE_QUANTITY) {
            return Err(AppError::validation(format!(
                "Quantity for service {} cannot exceed {}",
                line.service_id, MAX_LINE_QUANTITY
            )));
        }
        if self.address.trim().is_empty() {
            return Err(AppError::validation("Address is required"));
        }
        if self.date.trim().is_empty() {
            return Err(AppError::validation("Date is required"));
        }
        if self.time.trim().is_empty() {
            return Err(AppError::validation("Time slot is required"));
        }
        if self.mobile.trim().is_empty() {
            return Err(AppError::validation("Mobile number is required"));
        }
        if !MOBILE_PATTERN.is_match(&self.mobile) {
            return Err(AppError::validation("Mobile number must be exactly 10 digits"));
        }
        Ok(())
    }

    /// Distinct service ids in first-seen order.
    pub fn service_ids(&self) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            if !ids.contains(&line.service_id) {
                ids.push(line.service_id);
            }
        }
        ids
    }
}

/// A priced booking ready to persist
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub user_id: Uuid,
    pub items: Vec<BookingItem>,
    pub total_amount: Decimal,
    pub address: String,
    pub date: String,
    pub time: String,
    pub mobile: String,
    pub instructions: String,
}

impl NewBooking {
    /// Snapshot each line's unit price from `catalog` and total the booking.
    ///
    /// Fails with `NotFound` naming the first line whose service is missing,
    /// so nothing is priced unless every line resolves.
    pub fn price(owner: Uuid, request: BookingRequest, catalog: &[Service]) -> AppResult<Self> {
        request.validate()?;

        let by_id: HashMap<Uuid, &Service> = catalog.iter().map(|s| (s.id, s)).collect();

        let items = request
            .lines
            .iter()
            .map(|line| {
                let service = by_id.get(&line.service_id).ok_or_else(|| {
                    AppError::NotFound(format!("Service with ID {} not found", line.service_id))
                })?;
                Ok(BookingItem {
                    service_id: service.id,
                    quantity: line.quantity,
                    price: service.price,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        let total_amount = total_of(&items)?;

        Ok(Self {
            user_id: owner,
            items,
            total_amount,
            address: request.address,
            date: request.date,
            time: request.time,
            mobile: request.mobile,
            instructions: request.instructions.unwrap_or_default(),
        })
    }
}

/// Σ unit price × quantity, exact. Capped at what the money columns store.
pub fn total_of(items: &[BookingItem]) -> AppResult<Decimal> {
    let total = items.iter().try_fold(Decimal::ZERO, |acc, item| {
        acc.checked_add(item.subtotal()?)
            .ok_or_else(|| AppError::validation("Booking total is out of range"))
    })?;
    if total > MAX_MONEY_AMOUNT {
        return Err(AppError::validation("Booking total is out of range"));
    }
    Ok(total)
}

/// A line's service: expanded when it still resolves, otherwise the bare id.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum ServiceRef {
    Expanded(ServiceSummary),
    Id(Uuid),
}

/// Booking line as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BookingLineResponse {
    pub service: ServiceRef,
    pub quantity: i32,
    #[schema(value_type = f64)]
    pub price: Decimal,
}

/// Booking as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: Uuid,
    pub user: Uuid,
    pub services: Vec<BookingLineResponse>,
    #[schema(value_type = f64, example = 1300)]
    pub total_amount: Decimal,
    pub address: String,
    pub date: String,
    pub time: String,
    pub mobile: String,
    pub instructions: String,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingResponse {
    /// Build a response, expanding every line whose service is in `services`.
    pub fn expand(booking: Booking, services: &HashMap<Uuid, ServiceSummary>) -> Self {
        let lines = booking
            .items
            .iter()
            .map(|item| BookingLineResponse {
                service: services
                    .get(&item.service_id)
                    .cloned()
                    .map(ServiceRef::Expanded)
                    .unwrap_or(ServiceRef::Id(item.service_id)),
                quantity: item.quantity,
                price: item.price,
            })
            .collect();
        Self::with_lines(booking, lines)
    }

    /// Build a response with unexpanded service ids.
    pub fn bare(booking: Booking) -> Self {
        Self::expand(booking, &HashMap::new())
    }

    fn with_lines(booking: Booking, services: Vec<BookingLineResponse>) -> Self {
        Self {
            id: booking.id,
            user: booking.user_id,
            services,
            total_amount: booking.total_amount,
            address: booking.address,
            date: booking.date,
            time: booking.time,
            mobile: booking.mobile,
            instructions: booking.instructions,
            status: booking.status,
            payment_status: booking.payment_status,
            rating: booking.rating,
            review: booking.review,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}
