//! Catalog entries (bookable services) and listing filters.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{MAX_MONEY_AMOUNT, MAX_SERVICE_RATING};
use crate::errors::{AppError, AppResult};

/// Closed set of categories a catalog entry may belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Plumbing,
    Electrical,
    Salon,
    Carpenter,
    Cleaning,
    Painting,
    Tech,
}

impl ServiceType {
    pub const ALL: [ServiceType; 7] = [
        ServiceType::Plumbing,
        ServiceType::Electrical,
        ServiceType::Salon,
        ServiceType::Carpenter,
        ServiceType::Cleaning,
        ServiceType::Painting,
        ServiceType::Tech,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Plumbing => "plumbing",
            ServiceType::Electrical => "electrical",
            ServiceType::Salon => "salon",
            ServiceType::Carpenter => "carpenter",
            ServiceType::Cleaning => "cleaning",
            ServiceType::Painting => "painting",
            ServiceType::Tech => "tech",
        }
    }
}

impl std::str::FromStr for ServiceType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                AppError::validation(format!(
                    "Invalid service type '{}'. Must be one of: {}",
                    s,
                    ServiceType::ALL.map(|t| t.as_str()).join(", ")
                ))
            })
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[schema(value_type = f64, example = 800)]
    pub price: Decimal,
    /// Stored category. Rows seeded outside the API may carry ad-hoc values.
    #[schema(example = "plumbing")]
    pub service_type: String,
    pub provider: String,
    /// Duration in minutes
    pub duration: i32,
    pub image: String,
    pub rating: f64,
    pub review_count: i32,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a new catalog entry
#[derive(Debug, Clone, PartialEq)]
pub struct NewService {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub service_type: ServiceType,
    pub provider: String,
    pub duration: i32,
    pub image: String,
    pub rating: f64,
    pub review_count: i32,
    pub available: bool,
}

impl NewService {
    /// Check the catalog invariants: price ≥ 0, duration > 0, rating ∈ [0, 5].
    pub fn validate(&self) -> AppResult<()> {
        for (field, value) in [
            ("name", &self.name),
            ("description", &self.description),
            ("provider", &self.provider),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::validation(format!("{} is required", field)));
            }
        }
        check_price(self.price)?;
        check_duration(self.duration)?;
        check_rating(self.rating)?;
        if self.review_count < 0 {
            return Err(AppError::validation("Review count cannot be negative"));
        }
        Ok(())
    }
}

/// Partial update of a catalog entry. `None` leaves the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub service_type: Option<ServiceType>,
    pub provider: Option<String>,
    pub duration: Option<i32>,
    pub image: Option<String>,
    pub available: Option<bool>,
}

impl ServiceChanges {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(price) = self.price {
            check_price(price)?;
        }
        if let Some(duration) = self.duration {
            check_duration(duration)?;
        }
        Ok(())
    }
}

fn check_price(price: Decimal) -> AppResult<()> {
    if price < Decimal::ZERO {
        return Err(AppError::validation("Price cannot be negative"));
    }
    if price > MAX_MONEY_AMOUNT {
        return Err(AppError::validation(format!(
            "Price cannot exceed {}",
            MAX_MONEY_AMOUNT
        )));
    }
    Ok(())
}

fn check_duration(duration: i32) -> AppResult<()> {
    if duration <= 0 {
        return Err(AppError::validation("Duration must be a positive number of minutes"));
    }
    Ok(())
}

fn check_rating(rating: f64) -> AppResult<()> {
    if !(0.0..=MAX_SERVICE_RATING).contains(&rating) {
        return Err(AppError::validation("Rating must be between 0 and 5"));
    }
    Ok(())
}

/// Fields of a service shown inside a booking
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub provider: String,
    pub duration: i32,
    pub service_type: String,
}

impl From<&Service> for ServiceSummary {
    fn from(service: &Service) -> Self {
        Self {
            id: service.id,
            name: service.name.clone(),
            image: service.image.clone(),
            provider: service.provider.clone(),
            duration: service.duration,
            service_type: service.service_type.clone(),
        }
    }
}

/// Ordering applied to a catalog listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    PriceLow,
    PriceHigh,
    Rating,
    /// Newest first
    #[default]
    Newest,
}

impl SortKey {
    /// Unknown or empty keys fall back to newest first.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("price-low") => SortKey::PriceLow,
            Some("price-high") => SortKey::PriceHigh,
            Some("rating") => SortKey::Rating,
            _ => SortKey::Newest,
        }
    }
}

/// Normalized catalog listing filter. Only available services are ever listed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogFilter {
    pub service_type: Option<String>,
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort: SortKey,
}

impl CatalogFilter {
    /// Build a filter from raw query-string values.
    ///
    /// Empty strings count as absent. A price bound that is not a number is a
    /// validation error.
    pub fn from_params(
        service_type: Option<&str>,
        search: Option<&str>,
        min_price: Option<&str>,
        max_price: Option<&str>,
        sort: Option<&str>,
    ) -> AppResult<Self> {
        Ok(Self {
            service_type: non_empty(service_type),
            search: non_empty(search),
            min_price: parse_price_bound("minPrice", min_price)?,
            max_price: parse_price_bound("maxPrice", max_price)?,
            sort: SortKey::parse(sort),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_price_bound(field: &str, raw: Option<&str>) -> AppResult<Option<Decimal>> {
    match non_empty(raw) {
        None => Ok(None),
        Some(v) => v
            .parse::<Decimal>()
            .map(Some)
            .map_err(|_| AppError::validation(format!("{} must be a number", field))),
    }
}
