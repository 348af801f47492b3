//! Booking repository implementation.
//!
//! A booking is a header row plus ordered line rows. Both are written in one
//! database transaction.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use super::entities::booking::{self, Entity as BookingEntity};
use super::entities::booking_item::{self, Entity as BookingItemEntity};
use crate::domain::{Booking, BookingItem, BookingStatus, NewBooking, PaymentStatus};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(test)]
use mockall::automock;

/// Booking repository trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persist a priced booking as `pending`/`pending`
    async fn create(&self, booking: NewBooking) -> AppResult<Booking>;

    /// Find booking by ID with its lines in order
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>>;

    /// Every booking owned by `user_id`, newest first
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Booking>>;

    /// Write back status, rating and review of an existing booking
    async fn save_progress(&self, booking: &Booking) -> AppResult<Booking>;
}

/// SeaORM-backed booking repository
pub struct BookingStore {
    db: Arc<DatabaseConnection>,
}

impl BookingStore {
    /// Create new repository instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn into_domain(header: booking::Model, mut items: Vec<booking_item::Model>) -> AppResult<Booking> {
    items.sort_by_key(|item| item.position);

    let status = header
        .status
        .parse::<BookingStatus>()
        .map_err(|_| AppError::internal(format!("Corrupt status on booking {}", header.id)))?;
    let payment_status = header.payment_status.parse::<PaymentStatus>().map_err(|_| {
        AppError::internal(format!("Corrupt payment status on booking {}", header.id))
    })?;

    Ok(Booking {
        id: header.id,
        user_id: header.user_id,
        items: items.into_iter().map(BookingItem::from).collect(),
        total_amount: header.total_amount,
        address: header.address,
        date: header.date,
        time: header.time,
        mobile: header.mobile,
        instructions: header.instructions,
        status,
        payment_status,
        rating: header.rating,
        review: header.review,
        created_at: header.created_at,
        updated_at: header.updated_at,
    })
}

#[async_trait]
impl BookingRepository for BookingStore {
    async fn create(&self, booking: NewBooking) -> AppResult<Booking> {
        let now = chrono::Utc::now();
        let booking_id = Uuid::new_v4();

        let header = booking::ActiveModel {
            id: Set(booking_id),
            user_id: Set(booking.user_id),
            total_amount: Set(booking.total_amount),
            address: Set(booking.address),
            date: Set(booking.date),
            time: Set(booking.time),
            mobile: Set(booking.mobile),
            instructions: Set(booking.instructions),
            status: Set(BookingStatus::Pending.as_str().to_string()),
            payment_status: Set(PaymentStatus::Pending.as_str().to_string()),
            rating: Set(None),
            review: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let lines: Vec<booking_item::ActiveModel> = booking
            .items
            .iter()
            .enumerate()
            .map(|(position, item)| booking_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                booking_id: Set(booking_id),
                position: Set(position as i32),
                service_id: Set(item.service_id),
                quantity: Set(item.quantity),
                price: Set(item.price),
            })
            .collect();

        // Dropping the transaction on an early return rolls it back.
        let txn = self.db.begin().await?;
        let header = header.insert(&txn).await?;
        BookingItemEntity::insert_many(lines).exec(&txn).await?;
        txn.commit().await?;

        tracing::debug!(booking_id = %header.id, lines = booking.items.len(), "Booking stored");

        Ok(Booking {
            items: booking.items,
            ..into_domain(header, Vec::new())?
        })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        let Some(header) = BookingEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(AppError::from)?
        else {
            return Ok(None);
        };

        let items = header
            .find_related(BookingItemEntity)
            .order_by_asc(booking_item::Column::Position)
            .all(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        into_domain(header, items).map(Some)
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Booking>> {
        let headers = BookingEntity::find()
            .filter(booking::Column::UserId.eq(user_id))
            .order_by_desc(booking::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        if headers.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = headers.iter().map(|h| h.id).collect();
        let mut lines_by_booking: HashMap<Uuid, Vec<booking_item::Model>> = HashMap::new();
        for item in BookingItemEntity::find()
            .filter(booking_item::Column::BookingId.is_in(ids))
            .all(self.db.as_ref())
            .await
            .map_err(AppError::from)?
        {
            lines_by_booking.entry(item.booking_id).or_default().push(item);
        }

        headers
            .into_iter()
            .map(|header| {
                let items = lines_by_booking.remove(&header.id).unwrap_or_default();
                into_domain(header, items)
            })
            .collect()
    }

    async fn save_progress(&self, booking: &Booking) -> AppResult<Booking> {
        let header = BookingEntity::find_by_id(booking.id)
            .one(self.db.as_ref())
            .await?
            .ok_or_not_found("Booking")?;

        let mut active: booking::ActiveModel = header.into();
        active.status = Set(booking.status.as_str().to_string());
        active.rating = Set(booking.rating);
        active.review = Set(booking.review.clone());
        active.updated_at = Set(chrono::Utc::now());

        let header = active.update(self.db.as_ref()).await.map_err(AppError::from)?;

        Ok(Booking {
            items: booking.items.clone(),
            ..into_domain(header, Vec::new())?
        })
    }
}
