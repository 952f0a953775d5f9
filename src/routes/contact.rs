/**
 * Contact Routes
 * Client inquiry form: renders the inquiry as HTML and emails it to the
 * agency inbox
 */
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::routes::{ErrorResponse, SuccessResponse};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub project_type: Vec<String>,
    #[serde(default)]
    pub project_description: String,
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub timeline: String,
    #[serde(default)]
    pub hear_about_us: String,
    #[serde(default)]
    pub additional_info: String,
}

impl InquiryRequest {
    fn is_complete(&self) -> bool {
        !self.full_name.trim().is_empty()
            && !self.email.trim().is_empty()
            && !self.phone.trim().is_empty()
            && !self.project_type.is_empty()
            && !self.project_description.trim().is_empty()
    }
}

/// Map form service slugs to their display names; unknown slugs pass
/// through unchanged.
fn service_name(slug: &str) -> &str {
    match slug {
        "social" => "Social Media Management",
        "video" => "Video Editing",
        "photo" => "Photography",
        "design" => "Graphic Design",
        "marketing" => "Digital Marketing",
        other => other,
    }
}

/// Render the inquiry email body. All user-supplied text is run through the
/// HTML sanitizer before interpolation, so plain text passes through
/// readable while script and event-handler markup is stripped.
fn render_inquiry_html(inquiry: &InquiryRequest) -> String {
    let esc = |s: &str| ammonia::clean(s);

    let services = inquiry
        .project_type
        .iter()
        .map(|slug| esc(service_name(slug)))
        .collect::<Vec<_>>()
        .join(", ");

    let optional_line = |label: &str, value: &str| {
        if value.trim().is_empty() {
            String::new()
        } else {
            format!("<p><strong>{}:</strong> {}</p>", label, esc(value))
        }
    };

    let additional = if inquiry.additional_info.trim().is_empty() {
        String::new()
    } else {
        format!(
            "<h3 style=\"color: #333;\">Additional Information</h3>\
             <p style=\"background: #f5f5f5; padding: 12px; border-radius: 8px;\">{}</p>",
            esc(&inquiry.additional_info)
        )
    };

    format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
         <h2 style=\"color: #6D412A; border-bottom: 2px solid #6D412A; padding-bottom: 10px;\">New Client Inquiry</h2>\
         <h3 style=\"color: #333;\">Contact Information</h3>\
         <p><strong>Name:</strong> {name}</p>\
         <p><strong>Email:</strong> {email}</p>\
         <p><strong>Phone:</strong> {phone}</p>\
         {company}\
         <h3 style=\"color: #333;\">Project Details</h3>\
         <p><strong>Services Interested In:</strong> {services}</p>\
         <p><strong>Project Description:</strong></p>\
         <p style=\"background: #f5f5f5; padding: 12px; border-radius: 8px;\">{description}</p>\
         {budget}\
         {timeline}\
         {heard}\
         {additional}\
         <hr style=\"margin-top: 20px; border: none; border-top: 1px solid #ddd;\" />\
         <p style=\"color: #999; font-size: 12px;\">This message was sent from the website contact form.</p>\
         </div>",
        name = esc(&inquiry.full_name),
        email = esc(&inquiry.email),
        phone = esc(&inquiry.phone),
        company = optional_line("Company", &inquiry.company_name),
        services = services,
        description = esc(&inquiry.project_description),
        budget = optional_line("Budget", &inquiry.budget),
        timeline = optional_line("Timeline", &inquiry.timeline),
        heard = optional_line("How they heard about us", &inquiry.hear_about_us),
        additional = additional,
    )
}

/// POST /api/contact
/// Public inquiry submission; emails the rendered form to the agency.
pub async fn submit(
    State(state): State<AppState>,
    Json(inquiry): Json<InquiryRequest>,
) -> Response {
    if !inquiry.is_complete() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Missing required fields")),
        )
            .into_response();
    }

    let subject = format!("New Inquiry from {}", inquiry.full_name);
    let html = render_inquiry_html(&inquiry);

    match state
        .mailer
        .send(&subject, Some(inquiry.email.as_str()), &html)
        .await
    {
        Ok(()) => (StatusCode::OK, Json(SuccessResponse { success: true })).into_response(),
        Err(e) => {
            tracing::error!("Error sending email: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to send email")),
            )
                .into_response()
        }
    }
}
