//! Shared fixtures for integration tests.
//!
//! The repositories here keep everything in memory so the real services,
//! password hashing and session tokens run end to end without a database.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{DbBackend, MockDatabase, MockExecResult};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use door_elite::api::{create_router, AppState};
use door_elite::config::Config;
use door_elite::domain::{
    Booking, BookingStatus, CatalogFilter, NewBooking, NewService, Password, PaymentStatus,
    ProfileUpdate, Service, ServiceChanges, ServiceType, SortKey, User, UserRole,
};
use door_elite::errors::{AppError, AppResult};
use door_elite::infra::{
    BookingRepository, Database, NewUser, ServiceRepository, UnitOfWork, UserRepository,
};
use door_elite::services::{
    Authenticator, BookingManager, CatalogManager, Services, UserManager,
};

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-chars";

// =============================================================================
// In-memory repositories
// =============================================================================

#[derive(Default)]
pub struct MemoryUsers {
    rows: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            avatar: None,
            phone: None,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> AppResult<User> {
        let mut rows = self.rows.lock().unwrap();
        let user = rows
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::not_found("User"))?;
        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(phone) = update.phone {
            user.phone = Some(phone);
        }
        if let Some(avatar) = update.avatar {
            user.avatar = Some(avatar);
        }
        Ok(user.clone())
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let user = rows
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::not_found("User"))?;
        user.password_hash = password_hash;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryServices {
    rows: Mutex<Vec<Service>>,
}

impl MemoryServices {
    pub fn all(&self) -> Vec<Service> {
        self.rows.lock().unwrap().clone()
    }
}

fn matches_filter(service: &Service, filter: &CatalogFilter) -> bool {
    if !service.available {
        return false;
    }
    if let Some(kind) = &filter.service_type {
        if &service.service_type != kind {
            return false;
        }
    }
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        let hit = [&service.name, &service.description, &service.provider]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle));
        if !hit {
            return false;
        }
    }
    if filter.min_price.is_some_and(|min| service.price < min) {
        return false;
    }
    if filter.max_price.is_some_and(|max| service.price > max) {
        return false;
    }
    true
}

#[async_trait]
impl ServiceRepository for MemoryServices {
    async fn list(&self, filter: &CatalogFilter) -> AppResult<Vec<Service>> {
        let mut services: Vec<Service> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| matches_filter(s, filter))
            .cloned()
            .collect();

        match filter.sort {
            SortKey::PriceLow => services.sort_by(|a, b| a.price.cmp(&b.price)),
            SortKey::PriceHigh => services.sort_by(|a, b| b.price.cmp(&a.price)),
            SortKey::Rating => services.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
            SortKey::Newest => services.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }
        Ok(services)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Service>> {
        Ok(self.rows.lock().unwrap().iter().find(|s| s.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Service>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| ids.contains(&s.id))
            .cloned()
            .collect())
    }

    async fn create(&self, service: NewService) -> AppResult<Service> {
        let now = Utc::now();
        let service = Service {
            id: Uuid::new_v4(),
            name: service.name,
            description: service.description,
            price: service.price,
            service_type: service.service_type.to_string(),
            provider: service.provider,
            duration: service.duration,
            image: service.image,
            rating: service.rating,
            review_count: service.review_count,
            available: service.available,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(service.clone());
        Ok(service)
    }

    async fn update(&self, id: Uuid, changes: ServiceChanges) -> AppResult<Option<Service>> {
        let mut rows = self.rows.lock().unwrap();
        let Some(service) = rows.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            service.name = name;
        }
        if let Some(price) = changes.price {
            service.price = price;
        }
        if let Some(image) = changes.image {
            service.image = image;
        }
        if let Some(available) = changes.available {
            service.available = available;
        }
        service.updated_at = Utc::now();
        Ok(Some(service.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|s| s.id != id);
        Ok(rows.len() < before)
    }

    async fn delete_all(&self) -> AppResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let removed = rows.len() as u64;
        rows.clear();
        Ok(removed)
    }
}

#[derive(Default)]
pub struct MemoryBookings {
    rows: Mutex<Vec<Booking>>,
}

impl MemoryBookings {
    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn status_of(&self, id: Uuid) -> Option<BookingStatus> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == id)
            .map(|b| b.status)
    }
}

#[async_trait]
impl BookingRepository for MemoryBookings {
    async fn create(&self, booking: NewBooking) -> AppResult<Booking> {
        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4(),
            user_id: booking.user_id,
            items: booking.items,
            total_amount: booking.total_amount,
            address: booking.address,
            date: booking.date,
            time: booking.time,
            mobile: booking.mobile,
            instructions: booking.instructions,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            rating: None,
            review: None,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(booking.clone());
        Ok(booking)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        Ok(self.rows.lock().unwrap().iter().find(|b| b.id == id).cloned())
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn save_progress(&self, booking: &Booking) -> AppResult<Booking> {
        let mut rows = self.rows.lock().unwrap();
        let stored = rows
            .iter_mut()
            .find(|b| b.id == booking.id)
            .ok_or_else(|| AppError::not_found("Booking"))?;
        stored.status = booking.status;
        stored.rating = booking.rating;
        stored.review = booking.review.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }
}

/// In-memory Unit of Work
#[derive(Default)]
pub struct MemoryPersistence {
    pub users: Arc<MemoryUsers>,
    pub services: Arc<MemoryServices>,
    pub bookings: Arc<MemoryBookings>,
}

impl UnitOfWork for MemoryPersistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn services(&self) -> Arc<dyn ServiceRepository> {
        self.services.clone()
    }

    fn bookings(&self) -> Arc<dyn BookingRepository> {
        self.bookings.clone()
    }
}

// =============================================================================
// Application harness
// =============================================================================

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryPersistence>,
    uploads: TempDir,
}

impl TestApp {
    /// Router over real services and in-memory persistence.
    pub fn new() -> Self {
        Self::with_database(MockDatabase::new(DbBackend::Postgres))
    }

    /// Same, with a database that answers one health ping.
    pub fn with_healthy_database() -> Self {
        Self::with_database(MockDatabase::new(DbBackend::Postgres).append_exec_results([
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
        ]))
    }

    fn with_database(db: MockDatabase) -> Self {
        let store = Arc::new(MemoryPersistence::default());
        let uploads = tempfile::tempdir().unwrap();
        let mut config = Config::for_secret(TEST_SECRET);
        config.upload_dir = uploads.path().to_string_lossy().into_owned();

        let container = Services::new(
            Arc::new(Authenticator::new(store.clone(), config.clone())),
            Arc::new(UserManager::new(store.clone())),
            Arc::new(CatalogManager::new(store.clone())),
            Arc::new(BookingManager::new(store.clone())),
        );
        let database = Arc::new(Database::from_connection(db.into_connection()));
        let state = AppState::from_container(&container, database, config);

        Self {
            router: create_router(state),
            store,
            uploads,
        }
    }

    /// Names of the files currently in this app's upload directory.
    pub fn uploaded_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.uploads.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Register an account and return its session cookie (`token=...`).
    pub async fn register(&self, name: &str, email: &str, password: &str) -> String {
        let response = self
            .send(json_request(
                "POST",
                "/user/register",
                None,
                serde_json::json!({ "name": name, "email": email, "password": password }),
            ))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.session_cookie().expect("register sets a cookie")
    }

    /// Insert an admin account directly and log it in.
    pub async fn admin_cookie(&self) -> String {
        self.store
            .users
            .create(NewUser {
                name: "Admin".to_string(),
                email: "admin@example.com".to_string(),
                password_hash: Password::new("admin-secret").unwrap().into_string(),
                role: UserRole::Admin,
            })
            .await
            .unwrap();

        let response = self
            .send(json_request(
                "POST",
                "/user/login",
                None,
                serde_json::json!({ "email": "admin@example.com", "password": "admin-secret" }),
            ))
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        response.session_cookie().expect("login sets a cookie")
    }

    /// Add a catalog entry directly.
    pub async fn add_service(&self, name: &str, price: i64, service_type: ServiceType) -> Service {
        self.store
            .services
            .create(NewService {
                name: name.to_string(),
                description: format!("{} description", name),
                price: Decimal::from(price),
                service_type,
                provider: "Test Provider".to_string(),
                duration: 60,
                image: "/images/default-service.jpg".to_string(),
                rating: 4.0,
                review_count: 0,
                available: true,
            })
            .await
            .unwrap()
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// `token=...` pair from the Set-Cookie header, if one was set.
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("token="))
            .and_then(|v| v.split(';').next())
            .map(str::to_string)
    }

    pub fn set_cookie_header(&self) -> Option<String> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }
}

pub fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// A file part for [`multipart_file_request`]
pub struct FilePart<'a> {
    pub field: &'a str,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub bytes: &'a [u8],
}

impl<'a> FilePart<'a> {
    pub fn png(field: &'a str, bytes: &'a [u8]) -> Self {
        Self {
            field,
            file_name: "picture.png",
            content_type: "image/png",
            bytes,
        }
    }
}

/// multipart/form-data request with text fields only
pub fn multipart_request(
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    fields: &[(&str, &str)],
) -> Request<Body> {
    build_multipart(method, uri, cookie, fields, None)
}

/// multipart/form-data request with text fields and one file
pub fn multipart_file_request(
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    fields: &[(&str, &str)],
    file: FilePart<'_>,
) -> Request<Body> {
    build_multipart(method, uri, cookie, fields, Some(file))
}

fn build_multipart(
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    fields: &[(&str, &str)],
    file: Option<FilePart<'_>>,
) -> Request<Body> {
    const BOUNDARY: &str = "door-elite-test-boundary";

    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some(file) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, file.field, file.file_name, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    let mut builder = Request::builder().method(method).uri(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={}", BOUNDARY),
    );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).unwrap()
}
