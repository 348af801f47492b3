//! Account handlers: registration, login, session and profile.

use axum::{
    extract::State,
    routing::{get, post, put},
    Extension, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{FormData, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::config::{Config, SESSION_COOKIE_NAME};
use crate::domain::{ProfileUpdate, UserResponse};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// User display name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Asha Verma")]
    pub name: String,
    /// User email address
    #[validate(email(message = "Please enter a valid email"))]
    #[schema(example = "asha@example.com")]
    pub email: String,
    /// User password (minimum 6 characters)
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    #[schema(example = "secret123", min_length = 6)]
    pub password: String,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Please enter a valid email"))]
    #[schema(example = "asha@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "secret123")]
    pub password: String,
}

/// Password change request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "New password must be at least 6 characters"))]
    pub new_password: String,
}

/// Multipart body of a profile update. Every part is optional.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct ProfileForm {
    #[schema(example = "Asha Verma")]
    name: Option<String>,
    #[schema(example = "9876543210")]
    phone: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    avatar: Option<Vec<u8>>,
}

/// `{ "user": ... }` payload
#[derive(Debug, Serialize, ToSchema)]
pub struct UserPayload {
    pub user: UserResponse,
}

/// Routes reachable without a session
pub fn user_public_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", get(logout))
}

/// Routes that require a session
pub fn user_protected_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me).put(update_profile))
        .route("/is-auth", get(is_auth))
        .route("/change-password", put(change_password))
}

/// HTTP-only session cookie carrying `token`.
fn session_cookie(token: String, config: &Config) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .secure(config.is_production())
        .same_site(SameSite::Strict)
        .max_age(time::Duration::days(config.jwt_expiration_days))
        .build()
}

/// Register a new user and start a session
#[utoipa::path(
    post,
    path = "/user/register",
    tag = "User",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered, session cookie set", body = UserPayload),
        (status = 400, description = "Validation error or user already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(CookieJar, Created<UserPayload>)> {
    let session = state
        .auth_service
        .register(payload.name, payload.email, payload.password)
        .await?;

    let jar = jar.add(session_cookie(session.token, &state.config));
    Ok((
        jar,
        Created(ApiResponse::success(UserPayload {
            user: UserResponse::from(session.user),
        })),
    ))
}

/// Log in and start a session
#[utoipa::path(
    post,
    path = "/user/login",
    tag = "User",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, session cookie set", body = UserPayload),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<(CookieJar, ApiResponse<UserPayload>)> {
    let session = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    let jar = jar.add(session_cookie(session.token, &state.config));
    Ok((
        jar,
        ApiResponse::success(UserPayload {
            user: UserResponse::from(session.user),
        }),
    ))
}

/// Clear the session cookie
#[utoipa::path(
    get,
    path = "/user/logout",
    tag = "User",
    responses((status = 200, description = "Logged out"))
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, ApiResponse<()>) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE_NAME).path("/"));
    (jar, ApiResponse::message("Logged out successfully"))
}

/// Current user's profile
#[utoipa::path(
    get,
    path = "/user/me",
    tag = "User",
    responses(
        (status = 200, description = "Profile", body = UserPayload),
        (status = 401, description = "Not authenticated")
    ),
    security(("session_cookie" = []))
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<ApiResponse<UserPayload>> {
    let user = state.user_service.get_user(current.id).await?;
    Ok(ApiResponse::success(UserPayload {
        user: UserResponse::from(user),
    }))
}

/// Check the session; returns the profile or 401
#[utoipa::path(
    get,
    path = "/user/is-auth",
    tag = "User",
    responses(
        (status = 200, description = "Session valid", body = UserPayload),
        (status = 401, description = "No or invalid session")
    ),
    security(("session_cookie" = []))
)]
pub async fn is_auth(
    state: State<AppState>,
    current: Extension<CurrentUser>,
) -> AppResult<ApiResponse<UserPayload>> {
    me(state, current).await
}

/// Update name, phone or avatar
#[utoipa::path(
    put,
    path = "/user/me",
    tag = "User",
    request_body(content = ProfileForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Profile updated", body = UserPayload),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated")
    ),
    security(("session_cookie" = []))
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    mut form: FormData,
) -> AppResult<ApiResponse<UserPayload>> {
    let mut update = ProfileUpdate {
        name: form.text("name").map(str::to_string),
        phone: form.text("phone").map(str::to_string),
        avatar: None,
    };
    // Reject bad fields before writing the upload to disk
    update.validate()?;

    if let Some(file) = form.take_file("avatar") {
        let stored = state
            .uploads
            .save(file.file_name.as_deref(), &file.bytes)
            .await?;
        update.avatar = Some(stored.url);
    }
    let avatar = update.avatar.clone();

    let user = match state.user_service.update_profile(current.id, update).await {
        Ok(user) => user,
        Err(e) => {
            if let Some(url) = avatar {
                state.uploads.discard(&url).await;
            }
            return Err(e);
        }
    };
    Ok(ApiResponse::with_message(
        UserPayload {
            user: UserResponse::from(user),
        },
        "Profile updated successfully",
    ))
}

/// Change password after confirming the current one
#[utoipa::path(
    put,
    path = "/user/change-password",
    tag = "User",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated or current password incorrect")
    ),
    security(("session_cookie" = []))
)]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .auth_service
        .change_password(current.id, payload.current_password, payload.new_password)
        .await?;

    Ok(ApiResponse::message("Password changed successfully"))
}
