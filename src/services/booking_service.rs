//! Booking service - Creation, listing and lifecycle transitions.
//!
//! Every transition loads the booking, checks ownership, applies the domain
//! rule, then writes the result back. Concurrent writers on the same booking
//! are last-write-wins.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    Booking, BookingRequest, BookingResponse, BookingStatus, NewBooking, ServiceSummary,
};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[cfg(test)]
use mockall::automock;

/// Booking service trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BookingService: Send + Sync {
    /// Price and store a booking for `user_id`
    async fn create(&self, user_id: Uuid, request: BookingRequest) -> AppResult<BookingResponse>;

    /// The caller's bookings, newest first
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<BookingResponse>>;

    /// Set any status on an owned booking
    async fn update_status(
        &self,
        user_id: Uuid,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> AppResult<BookingResponse>;

    /// Cancel an owned booking that is not completed
    async fn cancel(&self, user_id: Uuid, booking_id: Uuid) -> AppResult<BookingResponse>;

    /// Complete an owned confirmed or in-progress booking with a rating
    async fn complete(
        &self,
        user_id: Uuid,
        booking_id: Uuid,
        rating: i16,
        review: Option<String>,
    ) -> AppResult<BookingResponse>;
}

/// Concrete implementation of BookingService using Unit of Work.
pub struct BookingManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> BookingManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Load a booking the caller owns.
    async fn owned(&self, user_id: Uuid, booking_id: Uuid, action: &str) -> AppResult<Booking> {
        let booking = self
            .uow
            .bookings()
            .find_by_id(booking_id)
            .await?
            .ok_or_not_found("Booking")?;
        booking.ensure_owned_by(user_id, action)?;
        Ok(booking)
    }

    /// Summaries of every service referenced by `bookings`.
    /// A failed lookup degrades to an empty map, so responses carry bare ids.
    async fn summaries(&self, bookings: &[Booking]) -> HashMap<Uuid, ServiceSummary> {
        let mut ids: Vec<Uuid> = bookings
            .iter()
            .flat_map(|b| b.items.iter().map(|item| item.service_id))
            .collect();
        ids.sort_unstable();
        ids.dedup();

        match self.uow.services().find_by_ids(ids).await {
            Ok(services) => services
                .iter()
                .map(|s| (s.id, ServiceSummary::from(s)))
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Service lookup failed, returning bookings unexpanded");
                HashMap::new()
            }
        }
    }

    async fn expand_one(&self, booking: Booking) -> BookingResponse {
        let summaries = self.summaries(std::slice::from_ref(&booking)).await;
        BookingResponse::expand(booking, &summaries)
    }
}

#[async_trait]
impl<U: UnitOfWork> BookingService for BookingManager<U> {
    async fn create(&self, user_id: Uuid, request: BookingRequest) -> AppResult<BookingResponse> {
        request.validate()?;

        let catalog = self
            .uow
            .services()
            .find_by_ids(request.service_ids())
            .await?;
        let priced = NewBooking::price(user_id, request, &catalog)?;

        let booking = self.uow.bookings().create(priced).await?;
        tracing::info!(
            booking_id = %booking.id,
            user_id = %user_id,
            total = %booking.total_amount,
            "Booking created"
        );

        let summaries: HashMap<Uuid, ServiceSummary> = catalog
            .iter()
            .map(|s| (s.id, ServiceSummary::from(s)))
            .collect();
        Ok(BookingResponse::expand(booking, &summaries))
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<BookingResponse>> {
        let bookings = self.uow.bookings().list_for_user(user_id).await?;
        let summaries = self.summaries(&bookings).await;
        Ok(bookings
            .into_iter()
            .map(|booking| BookingResponse::expand(booking, &summaries))
            .collect())
    }

    async fn update_status(
        &self,
        user_id: Uuid,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> AppResult<BookingResponse> {
        let mut booking = self.owned(user_id, booking_id, "update").await?;
        booking.set_status(status);

        let booking = self.uow.bookings().save_progress(&booking).await?;
        tracing::info!(booking_id = %booking.id, status = %booking.status, "Booking status updated");
        Ok(self.expand_one(booking).await)
    }

    async fn cancel(&self, user_id: Uuid, booking_id: Uuid) -> AppResult<BookingResponse> {
        let mut booking = self.owned(user_id, booking_id, "cancel").await?;
        booking.cancel()?;

        let booking = self.uow.bookings().save_progress(&booking).await?;
        tracing::info!(booking_id = %booking.id, "Booking cancelled");
        Ok(self.expand_one(booking).await)
    }

    async fn complete(
        &self,
        user_id: Uuid,
        booking_id: Uuid,
        rating: i16,
        review: Option<String>,
    ) -> AppResult<BookingResponse> {
        let mut booking = self.owned(user_id, booking_id, "complete").await?;
        booking.complete(rating, review)?;

        let booking = self.uow.bookings().save_progress(&booking).await?;
        tracing::info!(booking_id = %booking.id, rating, "Booking completed");
        Ok(self.expand_one(booking).await)
    }
}
