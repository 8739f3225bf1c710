use actix_web::{HttpResponse, http::header};

/// 303 to `location`, carrying the feedback message a browser flash would show.
pub(crate) fn see_other(location: String, message: impl Into<String>) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.clone()))
        .json(serde_json::json!({
            "message": message.into(),
            "location": location
        }))
}
