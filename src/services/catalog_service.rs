//! Catalog service - Listing and administration of bookable services.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{CatalogFilter, NewService, Service, ServiceChanges};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[cfg(test)]
use mockall::automock;

/// Catalog service trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Available services matching the filter, sorted
    async fn list(&self, filter: CatalogFilter) -> AppResult<Vec<Service>>;

    /// Single service by ID
    async fn get(&self, id: Uuid) -> AppResult<Service>;

    /// Add a catalog entry
    async fn add(&self, service: NewService) -> AppResult<Service>;

    /// Change an existing catalog entry
    async fn update(&self, id: Uuid, changes: ServiceChanges) -> AppResult<Service>;

    /// Remove a catalog entry
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Load many entries at once, optionally wiping the catalog first.
    /// Returns the number of entries stored.
    async fn import(&self, services: Vec<NewService>, replace: bool) -> AppResult<usize>;
}

/// Concrete implementation of CatalogService using Unit of Work.
pub struct CatalogManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CatalogManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> CatalogService for CatalogManager<U> {
    async fn list(&self, filter: CatalogFilter) -> AppResult<Vec<Service>> {
        if let (Some(min), Some(max)) = (filter.min_price, filter.max_price) {
            if min > max {
                return Ok(Vec::new());
            }
        }
        self.uow.services().list(&filter).await
    }

    async fn get(&self, id: Uuid) -> AppResult<Service> {
        self.uow
            .services()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Service")
    }

    async fn add(&self, service: NewService) -> AppResult<Service> {
        service.validate()?;
        let service = self.uow.services().create(service).await?;
        tracing::info!(service_id = %service.id, name = %service.name, "Service added");
        Ok(service)
    }

    async fn update(&self, id: Uuid, changes: ServiceChanges) -> AppResult<Service> {
        changes.validate()?;
        let service = self
            .uow
            .services()
            .update(id, changes)
            .await?
            .ok_or_not_found("Service")?;
        tracing::info!(service_id = %id, "Service updated");
        Ok(service)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.uow.services().delete(id).await? {
            return Err(AppError::not_found("Service"));
        }
        tracing::info!(service_id = %id, "Service deleted");
        Ok(())
    }

    async fn import(&self, services: Vec<NewService>, replace: bool) -> AppResult<usize> {
        for service in &services {
            service.validate()?;
        }

        let repo = self.uow.services();
        if replace {
            let removed = repo.delete_all().await?;
            tracing::info!(removed, "Catalog cleared");
        }

        let count = services.len();
        for service in services {
            repo.create(service).await?;
        }
        Ok(count)
    }
}
