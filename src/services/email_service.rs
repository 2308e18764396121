use lettre::{
    message::{header::ContentType, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    Message, SmtpTransport, Transport,
};
use std::env;
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::admin::RESET_CODE_TTL_SECS;

// ==============================================================================
// Email Service
// ==============================================================================
//
// Delivery is out-of-band by design: the OTP state machine only cares
// whether this reports success. With SMTP_ENABLED unset the message is
// logged instead of sent, which also surfaces the OTP during development.

fn smtp_enabled() -> bool {
    env::var("SMTP_ENABLED")
        .unwrap_or_else(|_| "false".to_string())
        .to_lowercase()
        == "true"
}

/// Send the password-reset code to an admin.
pub async fn send_otp_email(
    to_email: &str,
    otp: &str,
    display_name: &str,
) -> Result<(), AppError> {
    let subject = "Password Reset OTP - BrokerHub Admin";
    let text_body = format!(
        "Hello {},\n\nYour OTP for password reset is: {}. Valid for {} seconds.\n\n\
         If you didn't request this, you can safely ignore this email.",
        display_name, otp, RESET_CODE_TTL_SECS
    );
    let html_body = format!(
        "<html><body>\
         <h2>Password Reset Request</h2>\
         <p>Hello {},</p>\
         <p>Your OTP code is:</p>\
         <p style=\"font-size:28px;font-weight:bold;letter-spacing:4px\">{}</p>\
         <p>This code is valid for <strong>{} seconds only</strong>. \
         Do not share it with anyone.</p>\
         </body></html>",
        display_name, otp, RESET_CODE_TTL_SECS
    );

    if !smtp_enabled() {
        info!("📧 SMTP disabled - OTP email for {} would be sent", to_email);
        info!("🔑 OTP CODE for {}: {}", to_email, otp);
        return Ok(());
    }

    send_via_smtp(to_email, subject, &text_body, &html_body)
}

/// Fire-and-forget greeting for newly registered admins.
pub async fn send_welcome_email(
    to_email: &str,
    display_name: &str,
    username: &str,
) -> Result<(), AppError> {
    let subject = "Welcome to BrokerHub Admin";
    let text_body = format!(
        "Hello {},\n\nYour admin account ({}) has been created successfully.",
        display_name, username
    );
    let html_body = format!(
        "<html><body>\
         <h2>Welcome aboard</h2>\
         <p>Hello {},</p>\
         <p>Your admin account (<strong>{}</strong>) has been created successfully.</p>\
         </body></html>",
        display_name, username
    );

    if !smtp_enabled() {
        info!(
            "📧 SMTP disabled - welcome email for {} would be sent",
            to_email
        );
        return Ok(());
    }

    send_via_smtp(to_email, subject, &text_body, &html_body)
}

fn send_via_smtp(
    to_email: &str,
    subject: &str,
    text_body: &str,
    html_body: &str,
) -> Result<(), AppError> {
    let smtp_host = env::var("SMTP_HOST")
        .map_err(|_| AppError::External("SMTP_HOST not set".into()))?;
    let smtp_port = env::var("SMTP_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(587);
    let smtp_username = env::var("SMTP_USERNAME")
        .map_err(|_| AppError::External("SMTP_USERNAME not set".into()))?;
    let smtp_password = env::var("SMTP_PASSWORD")
        .map_err(|_| AppError::External("SMTP_PASSWORD not set".into()))?;
    let from_email = env::var("SMTP_FROM_EMAIL")
        .unwrap_or_else(|_| "noreply@brokerhub.local".to_string());
    let from_name = env::var("SMTP_FROM_NAME").unwrap_or_else(|_| "BrokerHub".to_string());

    let from_address = format!("{} <{}>", from_name, from_email)
        .parse()
        .map_err(|e| AppError::External(format!("Invalid from address: {}", e)))?;
    let to_address = to_email
        .parse()
        .map_err(|e| AppError::External(format!("Invalid to address: {}", e)))?;

    let email = Message::builder()
        .from(from_address)
        .to(to_address)
        .subject(subject)
        .multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(text_body.to_string()),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(html_body.to_string()),
                ),
        )
        .map_err(|e| AppError::External(format!("Failed to build email: {}", e)))?;

    let creds = Credentials::new(smtp_username, smtp_password);

    let mailer = SmtpTransport::starttls_relay(&smtp_host)
        .map_err(|e| AppError::External(format!("Failed to create SMTP transport: {}", e)))?
        .port(smtp_port)
        .credentials(creds)
        .build();

    match mailer.send(&email) {
        Ok(_) => {
            info!("✅ Email sent successfully to {}", to_email);
            Ok(())
        }
        Err(e) => {
            error!("❌ SMTP send failed for {}: {}", to_email, e);
            Err(AppError::External(format!("SMTP send failed: {}", e)))
        }
    }
}
