use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

use crate::errors::AppError;

/// Reset codes are short-lived on purpose: a 6-digit space guessed at
/// most 3 times inside 60 seconds is not a useful target.
pub const RESET_CODE_TTL_SECS: i64 = 60;
pub const MAX_RESET_CODE_ATTEMPTS: i32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Admin {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    pub reset_code: Option<String>,
    #[serde(skip_serializing)]
    pub reset_code_expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    pub reset_code_attempts: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error, PartialEq)]
pub enum OtpError {
    #[error("No OTP found. Please request a new one.")]
    NoCodeIssued,
    #[error("OTP has expired. Please request a new one.")]
    Expired,
    #[error("Too many attempts. Please request a new OTP.")]
    AttemptsExhausted,
    #[error("Invalid OTP. Please try again.")]
    Mismatch,
}

impl From<OtpError> for AppError {
    fn from(value: OtpError) -> Self {
        match value {
            OtpError::NoCodeIssued => AppError::Validation(value.to_string()),
            OtpError::Expired => AppError::CodeExpired,
            OtpError::AttemptsExhausted => AppError::AttemptsExhausted,
            OtpError::Mismatch => AppError::CodeInvalid,
        }
    }
}

impl Admin {
    /// Issue a fresh 6-digit reset code, unconditionally replacing any
    /// previous one and zeroing the attempt counter. The caller persists
    /// the account and delivers the returned code out-of-band.
    pub fn issue_reset_code(&mut self, now: DateTime<Utc>) -> String {
        let code = format!("{:06}", rand::rng().random_range(0..1_000_000u32));
        self.reset_code = Some(code.clone());
        self.reset_code_expires_at = Some(now + Duration::seconds(RESET_CODE_TTL_SECS));
        self.reset_code_attempts = 0;
        code
    }

    /// Check a submitted code against the stored one. The attempt cap is
    /// checked before the comparison, so a correct code after three
    /// misses still fails. On a mismatch the counter is bumped in memory;
    /// the caller is responsible for persisting it. A match does NOT
    /// clear the code: clearing happens after the new password commits,
    /// so a short-lived reset token can be issued in between.
    pub fn verify_reset_code(
        &mut self,
        submitted: &str,
        now: DateTime<Utc>,
    ) -> Result<(), OtpError> {
        let (code, expires_at) = match (&self.reset_code, self.reset_code_expires_at) {
            (Some(code), Some(expires_at)) => (code.clone(), expires_at),
            _ => return Err(OtpError::NoCodeIssued),
        };

        if now > expires_at {
            return Err(OtpError::Expired);
        }

        if self.reset_code_attempts >= MAX_RESET_CODE_ATTEMPTS {
            return Err(OtpError::AttemptsExhausted);
        }

        if code != submitted {
            self.reset_code_attempts += 1;
            return Err(OtpError::Mismatch);
        }

        Ok(())
    }

    /// Return the account to the no-active-code state. Idempotent.
    pub fn clear_reset_code(&mut self) {
        self.reset_code = None;
        self.reset_code_expires_at = None;
        self.reset_code_attempts = 0;
    }

    /// A verified reset session is only honored while the code that
    /// started it is still on record and unexpired.
    pub fn has_live_reset_code(&self, now: DateTime<Utc>) -> bool {
        matches!(
            (&self.reset_code, self.reset_code_expires_at),
            (Some(_), Some(expires_at)) if now <= expires_at
        )
    }

    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            &self.username
        } else {
            &self.full_name
        }
    }
}

// ==============================================================================
// Request / Response DTOs
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterAdminRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
}

impl From<&Admin> for AdminSummary {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            username: admin.username.clone(),
            email: admin.email.clone(),
            full_name: admin.full_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Admin {
        Admin {
            id: Uuid::new_v4(),
            username: "root".into(),
            email: "root@example.com".into(),
            password_hash: "hash".into(),
            full_name: String::new(),
            is_active: true,
            last_login: None,
            reset_code: None,
            reset_code_expires_at: None,
            reset_code_attempts: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issued_code_is_six_digits() {
        let mut admin = account();
        for _ in 0..50 {
            let code = admin.issue_reset_code(Utc::now());
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert_eq!(admin.reset_code.as_deref(), Some(code.as_str()));
        }
    }

    #[test]
    fn test_issue_overwrites_prior_code_and_resets_attempts() {
        let mut admin = account();
        let now = Utc::now();

        let first = admin.issue_reset_code(now);
        assert_eq!(admin.verify_reset_code("999999", now), Err(OtpError::Mismatch));
        assert_eq!(admin.reset_code_attempts, 1);

        let second = admin.issue_reset_code(now);
        assert_eq!(admin.reset_code_attempts, 0);
        assert_eq!(
            admin.reset_code_expires_at,
            Some(now + Duration::seconds(RESET_CODE_TTL_SECS))
        );
        // with overwhelming probability the codes differ, but the stored
        // one must be the second either way
        assert_eq!(admin.reset_code.as_deref(), Some(second.as_str()));
        if first != second {
            assert_eq!(admin.verify_reset_code(&first, now), Err(OtpError::Mismatch));
        }
    }

    #[test]
    fn test_verify_without_code_fails() {
        let mut admin = account();
        assert_eq!(
            admin.verify_reset_code("123456", Utc::now()),
            Err(OtpError::NoCodeIssued)
        );
    }

    #[test]
    fn test_expired_code_fails_even_on_value_match() {
        let mut admin = account();
        let issued_at = Utc::now();
        let code = admin.issue_reset_code(issued_at);

        let late = issued_at + Duration::seconds(RESET_CODE_TTL_SECS + 1);
        assert_eq!(admin.verify_reset_code(&code, late), Err(OtpError::Expired));
        // expiry is checked before the attempt counter moves
        assert_eq!(admin.reset_code_attempts, 0);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let mut admin = account();
        let issued_at = Utc::now();
        let code = admin.issue_reset_code(issued_at);

        let at_expiry = issued_at + Duration::seconds(RESET_CODE_TTL_SECS);
        assert_eq!(admin.verify_reset_code(&code, at_expiry), Ok(()));
    }

    #[test]
    fn test_fourth_attempt_fails_even_with_correct_code() {
        let mut admin = account();
        let now = Utc::now();
        let code = admin.issue_reset_code(now);

        for attempt in 1..=3 {
            assert_eq!(admin.verify_reset_code("000000", now), Err(OtpError::Mismatch));
            assert_eq!(admin.reset_code_attempts, attempt);
        }

        assert_eq!(
            admin.verify_reset_code(&code, now),
            Err(OtpError::AttemptsExhausted)
        );
        assert_eq!(admin.reset_code_attempts, 3);
    }

    #[test]
    fn test_successful_verify_does_not_clear_code() {
        let mut admin = account();
        let now = Utc::now();
        let code = admin.issue_reset_code(now);

        assert_eq!(admin.verify_reset_code(&code, now), Ok(()));
        assert!(admin.reset_code.is_some());
        assert!(admin.has_live_reset_code(now));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut admin = account();
        admin.issue_reset_code(Utc::now());
        admin.reset_code_attempts = 2;

        admin.clear_reset_code();
        let snapshot = (
            admin.reset_code.clone(),
            admin.reset_code_expires_at,
            admin.reset_code_attempts,
        );
        admin.clear_reset_code();

        assert_eq!(snapshot, (None, None, 0));
        assert_eq!(admin.reset_code, None);
        assert_eq!(admin.reset_code_expires_at, None);
        assert_eq!(admin.reset_code_attempts, 0);
    }

    /// Issue at T0, wrong code at T0+10s, right code at T0+70s (expired),
    /// reissue at T0+71s with a fresh counter.
    #[test]
    fn test_end_to_end_reset_timeline() {
        let mut admin = account();
        let t0 = Utc::now();

        admin.reset_code = Some("482193".into());
        admin.reset_code_expires_at = Some(t0 + Duration::seconds(RESET_CODE_TTL_SECS));
        admin.reset_code_attempts = 0;

        assert_eq!(
            admin.verify_reset_code("000000", t0 + Duration::seconds(10)),
            Err(OtpError::Mismatch)
        );
        assert_eq!(admin.reset_code_attempts, 1);

        assert_eq!(
            admin.verify_reset_code("482193", t0 + Duration::seconds(70)),
            Err(OtpError::Expired)
        );
        assert_eq!(admin.reset_code_attempts, 1);

        let reissued_at = t0 + Duration::seconds(71);
        let code = admin.issue_reset_code(reissued_at);
        assert_eq!(admin.reset_code_attempts, 0);
        assert_eq!(admin.verify_reset_code(&code, reissued_at), Ok(()));
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let mut admin = account();
        assert_eq!(admin.display_name(), "root");
        admin.full_name = "Root Admin".into();
        assert_eq!(admin.display_name(), "Root Admin");
    }
}
