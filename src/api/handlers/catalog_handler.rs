//! Catalog handlers: public listing plus admin mutations.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::extractors::{parse_service_id, FormData};
use crate::api::AppState;
use crate::config::DEFAULT_SERVICE_IMAGE;
use crate::domain::{CatalogFilter, NewService, Service, ServiceChanges, ServiceType};
use crate::errors::{AppError, AppResult};
use crate::types::{ApiResponse, Created};

/// Query string of `GET /service/list`
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CatalogQuery {
    /// Category, e.g. `plumbing`
    pub service_type: Option<String>,
    /// Case-insensitive text matched against name, description and provider
    pub search: Option<String>,
    /// Inclusive lower price bound
    pub min_price: Option<String>,
    /// Inclusive upper price bound
    pub max_price: Option<String>,
    /// `price-low`, `price-high`, `rating` or newest first
    pub sort: Option<String>,
}

impl CatalogQuery {
    fn into_filter(self) -> AppResult<CatalogFilter> {
        CatalogFilter::from_params(
            self.service_type.as_deref(),
            self.search.as_deref(),
            self.min_price.as_deref(),
            self.max_price.as_deref(),
            self.sort.as_deref(),
        )
    }
}

/// Multipart body for adding or updating a catalog entry
#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct ServiceForm {
    #[schema(example = "Leak Repair")]
    name: String,
    description: String,
    #[schema(example = 499)]
    price: f64,
    service_type: ServiceType,
    #[schema(example = "QuickFix Plumbers")]
    provider: String,
    /// Minutes
    #[schema(example = 60)]
    duration: i32,
    /// Update only
    available: Option<bool>,
    /// Image file, or on update an image URL
    #[schema(value_type = Option<String>, format = Binary)]
    image: Option<Vec<u8>>,
}

/// `{ "services": [...] }` payload
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceListPayload {
    pub services: Vec<Service>,
}

/// `{ "service": ... }` payload
#[derive(Debug, Serialize, ToSchema)]
pub struct ServicePayload {
    pub service: Service,
}

/// Public catalog routes
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(list_services))
        .route("/:id", get(get_service))
}

/// Catalog mutations; mounted behind the admin gate
pub fn catalog_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(add_service))
        .route("/:id", put(update_service).delete(delete_service))
}

/// Store an uploaded `image` part, if any, and return its public URL.
async fn stored_image(state: &AppState, form: &mut FormData) -> AppResult<Option<String>> {
    match form.take_file("image") {
        Some(file) => {
            let stored = state
                .uploads
                .save(file.file_name.as_deref(), &file.bytes)
                .await?;
            Ok(Some(stored.url))
        }
        None => Ok(None),
    }
}

/// Drop a freshly stored image when the catalog write that referenced it failed.
async fn discard_on_error<T>(
    state: &AppState,
    uploaded: Option<String>,
    result: AppResult<T>,
) -> AppResult<T> {
    if result.is_err() {
        if let Some(url) = uploaded {
            state.uploads.discard(&url).await;
        }
    }
    result
}

fn parse_available(raw: Option<&str>) -> AppResult<Option<bool>> {
    match raw {
        None => Ok(None),
        Some("true") => Ok(Some(true)),
        Some("false") => Ok(Some(false)),
        Some(_) => Err(AppError::validation("Available must be true or false")),
    }
}

/// List available services
#[utoipa::path(
    get,
    path = "/service/list",
    tag = "Services",
    params(CatalogQuery),
    responses(
        (status = 200, description = "Matching services", body = ServiceListPayload),
        (status = 400, description = "Malformed price bound")
    )
)]
pub async fn list_services(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> AppResult<ApiResponse<ServiceListPayload>> {
    let services = state.catalog_service.list(query.into_filter()?).await?;
    Ok(ApiResponse::success(ServiceListPayload { services }))
}

/// Get a single service
#[utoipa::path(
    get,
    path = "/service/{id}",
    tag = "Services",
    params(("id" = String, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service", body = ServicePayload),
        (status = 400, description = "Invalid service ID"),
        (status = 404, description = "Service not found")
    )
)]
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ServicePayload>> {
    let id = parse_service_id(&id)?;
    let service = state.catalog_service.get(id).await?;
    Ok(ApiResponse::success(ServicePayload { service }))
}

/// Add a catalog entry
#[utoipa::path(
    post,
    path = "/service/add",
    tag = "Services",
    request_body(content = ServiceForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Service added", body = ServicePayload),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin access required")
    ),
    security(("session_cookie" = []))
)]
pub async fn add_service(
    State(state): State<AppState>,
    mut form: FormData,
) -> AppResult<Created<ServicePayload>> {
    let name = form.required("name", "Name")?;
    let description = form.required("description", "Description")?;
    let price = form
        .parse::<Decimal>("price", "Price")?
        .ok_or_else(|| AppError::validation("Price is required"))?;
    let service_type: ServiceType = form.required("serviceType", "Service type")?.parse()?;
    let provider = form.required("provider", "Provider")?;
    let duration = form
        .parse::<i32>("duration", "Duration")?
        .ok_or_else(|| AppError::validation("Duration is required"))?;

    let new_service = NewService {
        name,
        description,
        price,
        service_type,
        provider,
        duration,
        image: String::new(),
        rating: 0.0,
        review_count: 0,
        available: true,
    };
    // Reject bad fields before writing the upload to disk
    new_service.validate()?;

    let uploaded = stored_image(&state, &mut form).await?;
    let image = uploaded
        .clone()
        .unwrap_or_else(|| DEFAULT_SERVICE_IMAGE.to_string());

    let service = state
        .catalog_service
        .add(NewService {
            image,
            ..new_service
        })
        .await;
    let service = discard_on_error(&state, uploaded, service).await?;

    Ok(Created(ApiResponse::with_message(
        ServicePayload { service },
        "Service added successfully",
    )))
}

/// Update a catalog entry
#[utoipa::path(
    put,
    path = "/service/{id}",
    tag = "Services",
    params(("id" = String, Path, description = "Service ID")),
    request_body(content = ServiceForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Service updated", body = ServicePayload),
        (status = 400, description = "Validation error or invalid service ID"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Service not found")
    ),
    security(("session_cookie" = []))
)]
pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut form: FormData,
) -> AppResult<ApiResponse<ServicePayload>> {
    let id = parse_service_id(&id)?;

    let mut changes = ServiceChanges {
        name: form.text("name").map(str::to_string),
        description: form.text("description").map(str::to_string),
        price: form.parse::<Decimal>("price", "Price")?,
        service_type: form
            .text("serviceType")
            .map(str::parse::<ServiceType>)
            .transpose()?,
        provider: form.text("provider").map(str::to_string),
        duration: form.parse::<i32>("duration", "Duration")?,
        image: form.text("image").map(str::to_string),
        available: parse_available(form.text("available"))?,
    };
    changes.validate()?;

    let uploaded = stored_image(&state, &mut form).await?;
    if let Some(url) = &uploaded {
        changes.image = Some(url.clone());
    }

    let service = state.catalog_service.update(id, changes).await;
    let service = discard_on_error(&state, uploaded, service).await?;
    Ok(ApiResponse::with_message(
        ServicePayload { service },
        "Service updated successfully",
    ))
}

/// Delete a catalog entry
#[utoipa::path(
    delete,
    path = "/service/{id}",
    tag = "Services",
    params(("id" = String, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service deleted"),
        (status = 400, description = "Invalid service ID"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Service not found")
    ),
    security(("session_cookie" = []))
)]
pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let id = parse_service_id(&id)?;
    state.catalog_service.delete(id).await?;
    Ok(ApiResponse::message("Service deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SortKey;

    #[test]
    fn test_query_becomes_filter() {
        let query = CatalogQuery {
            service_type: Some("plumbing".to_string()),
            search: Some("  ".to_string()),
            min_price: Some("500".to_string()),
            max_price: None,
            sort: Some("price-high".to_string()),
        };
        let filter = query.into_filter().unwrap();

        assert_eq!(filter.service_type.as_deref(), Some("plumbing"));
        assert_eq!(filter.search, None);
        assert_eq!(filter.min_price, Some(Decimal::from(500)));
        assert_eq!(filter.max_price, None);
        assert_eq!(filter.sort, SortKey::PriceHigh);
    }

    #[test]
    fn test_malformed_price_bound_is_rejected() {
        let query = CatalogQuery {
            max_price: Some("cheap".to_string()),
            ..Default::default()
        };
        assert!(matches!(query.into_filter(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_parse_available() {
        assert_eq!(parse_available(Some("true")).unwrap(), Some(true));
        assert_eq!(parse_available(Some("false")).unwrap(), Some(false));
        assert_eq!(parse_available(None).unwrap(), None);
        assert!(parse_available(Some("yes")).is_err());
    }
}
