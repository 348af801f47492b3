//! Custom request extractors.

mod form;
mod path_id;
mod validated_json;

pub use form::{FormData, UploadedFile};
pub use path_id::{parse_booking_id, parse_service_id};
pub use validated_json::ValidatedJson;
