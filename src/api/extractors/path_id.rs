//! Path identifier parsing with client-facing messages.

use uuid::Uuid;

use crate::errors::{AppError, AppResult};

fn parse_id(raw: &str, message: &'static str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::bad_request(message))
}

/// Parse a `:id` segment on a catalog route.
pub fn parse_service_id(raw: &str) -> AppResult<Uuid> {
    parse_id(raw, "Invalid service ID")
}

/// Parse a `:id` segment on a booking route.
pub fn parse_booking_id(raw: &str) -> AppResult<Uuid> {
    parse_id(raw, "Invalid booking ID")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ids() {
        let id = Uuid::new_v4();
        assert_eq!(parse_booking_id(&id.to_string()).unwrap(), id);

        let err = parse_service_id("not-an-id").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "Invalid service ID"));

        let err = parse_booking_id("42").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "Invalid booking ID"));
    }
}
