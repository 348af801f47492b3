//! Catalog entry database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Service;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    pub service_type: String,
    pub provider: String,
    pub duration: i32,
    pub image: String,
    #[sea_orm(column_type = "Double")]
    pub rating: f64,
    pub review_count: i32,
    pub available: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Service {
    fn from(model: Model) -> Self {
        Service {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            service_type: model.service_type,
            provider: model.provider,
            duration: model.duration,
            image: model.image,
            rating: model.rating,
            review_count: model.review_count,
            available: model.available,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
