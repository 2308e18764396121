use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::auth;
use crate::db::admin_queries;
use crate::errors::AppError;
use crate::models::admin::{
    ForgotPasswordRequest, LoginRequest, RegisterAdminRequest, ResetPasswordRequest,
    VerifyOtpRequest,
};
use crate::models::AdminSummary;
use crate::services::email_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/forgot-password", post(forgot_password))
        .route("/verify-otp", post(verify_otp))
        .route("/reset-password", post(reset_password))
        .route("/verify", post(verify_session))
        .route("/logout", post(logout))
        .route("/create", post(create_admin))
}

// ==============================================================================
// Response DTOs
// ==============================================================================

#[derive(Debug, Serialize)]
struct LoginResponse {
    success: bool,
    message: String,
    token: String,
    admin: AdminSummary,
}

#[derive(Debug, Serialize)]
struct AdminCreatedResponse {
    success: bool,
    message: String,
    admin: AdminSummary,
}

#[derive(Debug, Serialize)]
struct ForgotPasswordResponse {
    success: bool,
    message: String,
    email: String,
}

#[derive(Debug, Serialize)]
struct VerifyOtpResponse {
    success: bool,
    message: String,
    reset_token: String,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    success: bool,
    message: String,
}

#[derive(Debug, Serialize)]
struct SessionResponse {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    admin: Option<AdminSummary>,
}

// ==============================================================================
// Auth Handlers
// ==============================================================================

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let username = req.username.trim();
    if username.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation("Username and password are required".into()));
    }

    let admin = admin_queries::find_active_by_username(&state.pool, username)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".into()))?;

    if !auth::verify_password(&req.password, &admin.password_hash) {
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    admin_queries::update_last_login(&state.pool, admin.id).await?;

    let token = auth::generate_token(admin.id, Duration::hours(auth::SESSION_TOKEN_TTL_HOURS))?;

    info!("🔓 Admin {} logged in", admin.username);

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".into(),
        token,
        admin: AdminSummary::from(&admin),
    }))
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterAdminRequest>,
) -> Result<(StatusCode, Json<AdminCreatedResponse>), AppError> {
    let username = req.username.trim().to_string();
    if !auth::is_valid_username(&username) {
        return Err(AppError::Validation(
            "Username must be 3-50 characters of letters, numbers, and underscores".into(),
        ));
    }
    if !auth::is_valid_email(&req.email) {
        return Err(AppError::Validation("Please provide a valid email address".into()));
    }
    if !auth::is_strong_password(&req.password) {
        return Err(AppError::Validation(
            "Password must be at least 6 characters with one lowercase letter, one uppercase \
             letter, and one number"
                .into(),
        ));
    }

    if admin_queries::exists_by_username_or_email(&state.pool, &username, &req.email).await? {
        return Err(AppError::Validation(
            "Admin with this username or email already exists".into(),
        ));
    }

    let password_hash = auth::hash_password(&req.password)?;
    let full_name = req.full_name.unwrap_or_default();
    let admin = admin_queries::insert_admin(
        &state.pool,
        &username,
        &req.email,
        &password_hash,
        full_name.trim(),
    )
    .await?;

    // Welcome email must not block registration
    let email = admin.email.clone();
    let display_name = admin.display_name().to_string();
    let admin_username = admin.username.clone();
    tokio::spawn(async move {
        if let Err(e) =
            email_service::send_welcome_email(&email, &display_name, &admin_username).await
        {
            warn!("Failed to send welcome email to {}: {}", email, e);
        }
    });

    info!("👤 Registered admin {}", admin.username);

    Ok((
        StatusCode::CREATED,
        Json(AdminCreatedResponse {
            success: true,
            message: "Admin registered successfully".into(),
            admin: AdminSummary::from(&admin),
        }),
    ))
}

async fn create_admin(
    State(state): State<AppState>,
    Json(req): Json<RegisterAdminRequest>,
) -> Result<(StatusCode, Json<AdminCreatedResponse>), AppError> {
    let username = req.username.trim().to_string();
    if !auth::is_valid_username(&username) {
        return Err(AppError::Validation(
            "Username must be 3-50 characters of letters, numbers, and underscores".into(),
        ));
    }
    if !auth::is_valid_email(&req.email) {
        return Err(AppError::Validation("Please provide a valid email address".into()));
    }
    if req.password.len() < 6 {
        return Err(AppError::Validation(
            "Password must be at least 6 characters long".into(),
        ));
    }

    if admin_queries::exists_by_username_or_email(&state.pool, &username, &req.email).await? {
        return Err(AppError::Validation(
            "Admin with this username or email already exists".into(),
        ));
    }

    let password_hash = auth::hash_password(&req.password)?;
    let full_name = req.full_name.unwrap_or_default();
    let admin = admin_queries::insert_admin(
        &state.pool,
        &username,
        &req.email,
        &password_hash,
        full_name.trim(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(AdminCreatedResponse {
            success: true,
            message: "Admin created successfully".into(),
            admin: AdminSummary::from(&admin),
        }),
    ))
}

// ==============================================================================
// Password Reset Flow
// ==============================================================================

async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>, AppError> {
    if !auth::is_valid_email(&req.email) {
        return Err(AppError::Validation("Please provide a valid email address".into()));
    }

    let mut admin = admin_queries::find_active_by_email(&state.pool, &req.email)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("No admin found with this email address".into())
        })?;

    let otp = admin.issue_reset_code(Utc::now());
    admin_queries::save_reset_fields(&state.pool, &admin).await?;

    email_service::send_otp_email(&admin.email, &otp, admin.display_name())
        .await
        .map_err(|e| {
            warn!("OTP email delivery failed for {}: {}", admin.email, e);
            AppError::External("Failed to send OTP email. Please try again.".into())
        })?;

    info!("🔑 Issued reset code for {}", admin.email);

    Ok(Json(ForgotPasswordResponse {
        success: true,
        message: "OTP sent to your email address. Valid for 60 seconds.".into(),
        email: admin.email,
    }))
}

async fn verify_otp(
    State(state): State<AppState>,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<Json<VerifyOtpResponse>, AppError> {
    if !auth::is_valid_email(&req.email) {
        return Err(AppError::Validation("Please provide a valid email address".into()));
    }
    let otp = req.otp.trim();
    if otp.len() != 6 || !otp.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation("OTP must be 6 digits".into()));
    }

    let mut admin = admin_queries::find_active_by_email(&state.pool, &req.email)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("No admin found with this email address".into())
        })?;

    if let Err(otp_err) = admin.verify_reset_code(otp, Utc::now()) {
        // Mismatches bump the attempt counter; keep it durable
        admin_queries::save_reset_fields(&state.pool, &admin).await?;
        return Err(otp_err.into());
    }

    // The code stays on record until the password is committed; this
    // token is the only thing the reset form needs in the meantime.
    let reset_token =
        auth::generate_token(admin.id, Duration::minutes(auth::RESET_TOKEN_TTL_MINUTES))?;

    Ok(Json(VerifyOtpResponse {
        success: true,
        message: "OTP verified successfully".into(),
        reset_token,
    }))
}

async fn reset_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if !auth::is_valid_email(&req.email) {
        return Err(AppError::Validation("Please provide a valid email address".into()));
    }
    if !auth::is_strong_password(&req.new_password) {
        return Err(AppError::Validation(
            "Password must be at least 6 characters with one lowercase letter, one uppercase \
             letter, and one number"
                .into(),
        ));
    }

    let token = auth::bearer_token(&headers)
        .ok_or_else(|| AppError::Unauthorized("Reset token required".into()))?;
    let token_admin_id = auth::verify_token(token)
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired reset token".into()))?;

    let mut admin = admin_queries::find_active_by_email(&state.pool, &req.email)
        .await?
        .filter(|admin| admin.id == token_admin_id)
        .ok_or_else(|| AppError::NotFound("Invalid reset request".into()))?;

    if !admin.has_live_reset_code(Utc::now()) {
        return Err(AppError::Validation(
            "Reset session expired. Please start over.".into(),
        ));
    }

    let password_hash = auth::hash_password(&req.new_password)?;
    admin_queries::update_password(&state.pool, admin.id, &password_hash).await?;

    // Clearing here is what prevents code reuse
    admin.clear_reset_code();
    admin_queries::save_reset_fields(&state.pool, &admin).await?;

    info!("🔒 Password reset completed for {}", admin.email);

    Ok(Json(MessageResponse {
        success: true,
        message: "Password reset successfully".into(),
    }))
}

// ==============================================================================
// Session Handlers
// ==============================================================================

async fn verify_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<SessionResponse> {
    let admin = match auth::bearer_token(&headers).and_then(auth::verify_token) {
        Some(admin_id) => admin_queries::find_by_id(&state.pool, admin_id)
            .await
            .ok()
            .flatten()
            .filter(|admin| admin.is_active),
        None => None,
    };

    match admin {
        Some(admin) => Json(SessionResponse {
            valid: true,
            admin: Some(AdminSummary::from(&admin)),
        }),
        None => Json(SessionResponse { valid: false, admin: None }),
    }
}

async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse {
        success: true,
        message: "Logout successful".into(),
    })
}
