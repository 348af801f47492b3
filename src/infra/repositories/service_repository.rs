//! Catalog repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Select, Set,
};
use uuid::Uuid;

use super::entities::service::{self, ActiveModel, Entity as ServiceEntity};
use crate::domain::{CatalogFilter, NewService, Service, ServiceChanges, SortKey};
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

/// Catalog repository trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    /// List available services matching `filter`, in the filter's order
    async fn list(&self, filter: &CatalogFilter) -> AppResult<Vec<Service>>;

    /// Find service by ID, available or not
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Service>>;

    /// Find every service whose ID is in `ids`. Missing IDs are skipped.
    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Service>>;

    /// Insert a new service
    async fn create(&self, service: NewService) -> AppResult<Service>;

    /// Apply a partial update. `None` if the service does not exist.
    async fn update(&self, id: Uuid, changes: ServiceChanges) -> AppResult<Option<Service>>;

    /// Delete a service. `false` if it did not exist.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Remove the whole catalog, returning the number of rows deleted
    async fn delete_all(&self) -> AppResult<u64>;
}

/// Build the listing query for `filter`.
///
/// Always restricted to available services. Text search is a
/// case-insensitive substring match on name, description or provider.
pub fn catalog_query(filter: &CatalogFilter) -> Select<ServiceEntity> {
    let mut query = ServiceEntity::find().filter(service::Column::Available.eq(true));

    if let Some(service_type) = &filter.service_type {
        query = query.filter(service::Column::ServiceType.eq(service_type.as_str()));
    }

    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(&search.to_lowercase()));
        let contains = |column: service::Column| {
            Expr::expr(Func::lower(Expr::col((ServiceEntity, column))))
                .like(LikeExpr::new(pattern.clone()).escape('\\'))
        };
        query = query.filter(
            Condition::any()
                .add(contains(service::Column::Name))
                .add(contains(service::Column::Description))
                .add(contains(service::Column::Provider)),
        );
    }

    if let Some(min) = filter.min_price {
        query = query.filter(service::Column::Price.gte(min));
    }
    if let Some(max) = filter.max_price {
        query = query.filter(service::Column::Price.lte(max));
    }

    match filter.sort {
        SortKey::PriceLow => query.order_by_asc(service::Column::Price),
        SortKey::PriceHigh => query.order_by_desc(service::Column::Price),
        SortKey::Rating => query.order_by_desc(service::Column::Rating),
        SortKey::Newest => query.order_by_desc(service::Column::CreatedAt),
    }
}

/// Escape LIKE metacharacters so user input matches literally.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// SeaORM-backed catalog repository
pub struct ServiceStore {
    db: Arc<DatabaseConnection>,
}

impl ServiceStore {
    /// Create new repository instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ServiceRepository for ServiceStore {
    async fn list(&self, filter: &CatalogFilter) -> AppResult<Vec<Service>> {
        tracing::debug!(?filter, "Listing catalog");
        let models = catalog_query(filter)
            .all(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Service::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Service>> {
        let result = ServiceEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Service::from))
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Service>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = ServiceEntity::find()
            .filter(service::Column::Id.is_in(ids))
            .all(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Service::from).collect())
    }

    async fn create(&self, service: NewService) -> AppResult<Service> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(service.name),
            description: Set(service.description),
            price: Set(service.price),
            service_type: Set(service.service_type.to_string()),
            provider: Set(service.provider),
            duration: Set(service.duration),
            image: Set(service.image),
            rating: Set(service.rating),
            review_count: Set(service.review_count),
            available: Set(service.available),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(self.db.as_ref()).await.map_err(AppError::from)?;
        Ok(Service::from(model))
    }

    async fn update(&self, id: Uuid, changes: ServiceChanges) -> AppResult<Option<Service>> {
        let Some(existing) = ServiceEntity::find_by_id(id).one(self.db.as_ref()).await? else {
            return Ok(None);
        };

        let mut active: ActiveModel = existing.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(price) = changes.price {
            active.price = Set(price);
        }
        if let Some(service_type) = changes.service_type {
            active.service_type = Set(service_type.to_string());
        }
        if let Some(provider) = changes.provider {
            active.provider = Set(provider);
        }
        if let Some(duration) = changes.duration {
            active.duration = Set(duration);
        }
        if let Some(image) = changes.image {
            active.image = Set(image);
        }
        if let Some(available) = changes.available {
            active.available = Set(available);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(self.db.as_ref()).await.map_err(AppError::from)?;
        Ok(Some(Service::from(model)))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = ServiceEntity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }

    async fn delete_all(&self) -> AppResult<u64> {
        let result = ServiceEntity::delete_many()
            .exec(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }
}
