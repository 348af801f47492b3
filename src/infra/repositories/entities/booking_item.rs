//! Booking line database entity for SeaORM.
//!
//! `service_id` is a plain reference: deleting a catalog entry leaves the
//! line and its price snapshot intact.

use sea_orm::entity::prelude::*;

use crate::domain::BookingItem;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "booking_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub booking_id: Uuid,
    /// Zero-based order of the line within its booking
    pub position: i32,
    pub service_id: Uuid,
    pub quantity: i32,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::booking::Entity",
        from = "Column::BookingId",
        to = "super::booking::Column::Id",
        on_delete = "Cascade"
    )]
    Booking,
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for BookingItem {
    fn from(model: Model) -> Self {
        BookingItem {
            service_id: model.service_id,
            quantity: model.quantity,
            price: model.price,
        }
    }
}
