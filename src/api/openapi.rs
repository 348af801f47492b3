//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{booking_handler, catalog_handler, user_handler};
use crate::config::SESSION_COOKIE_NAME;
use crate::domain::{
    BookingLineResponse, BookingResponse, BookingStatus, PaymentStatus, Service, ServiceRef,
    ServiceSummary, ServiceType, UserResponse, UserRole,
};

/// OpenAPI documentation for the Door Elite API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Door Elite API",
        version = "0.1.0",
        description = "Home-services marketplace: catalog, bookings and customer accounts",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:4000", description = "Local development server")
    ),
    paths(
        // Account endpoints
        user_handler::register,
        user_handler::login,
        user_handler::logout,
        user_handler::me,
        user_handler::is_auth,
        user_handler::update_profile,
        user_handler::change_password,
        // Catalog endpoints
        catalog_handler::list_services,
        catalog_handler::get_service,
        catalog_handler::add_service,
        catalog_handler::update_service,
        catalog_handler::delete_service,
        // Booking endpoints
        booking_handler::create_booking,
        booking_handler::list_user_bookings,
        booking_handler::update_booking_status,
        booking_handler::cancel_booking,
        booking_handler::complete_booking,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            ServiceType,
            Service,
            ServiceSummary,
            ServiceRef,
            BookingStatus,
            PaymentStatus,
            BookingLineResponse,
            BookingResponse,
            // Account handler types
            user_handler::RegisterRequest,
            user_handler::LoginRequest,
            user_handler::ChangePasswordRequest,
            user_handler::ProfileForm,
            user_handler::UserPayload,
            // Catalog handler types
            catalog_handler::ServiceForm,
            catalog_handler::ServiceListPayload,
            catalog_handler::ServicePayload,
            // Booking handler types
            booking_handler::BookingLineInput,
            booking_handler::CreateBookingRequest,
            booking_handler::UpdateStatusRequest,
            booking_handler::CompleteBookingRequest,
            booking_handler::BookingPayload,
            booking_handler::BookingListPayload,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "User", description = "Registration, login and profile"),
        (name = "Services", description = "Service catalog"),
        (name = "Bookings", description = "Customer bookings and their lifecycle")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for the session cookie
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    SESSION_COOKIE_NAME,
                    "JWT session cookie set by /user/register and /user/login",
                ))),
            );
        }
    }
}
