//! User model and account request bodies.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// A registered user. The password hash is never part of this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub bio: String,
    pub profile_pic_url: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for `POST /api/users` and `POST /api/auth/register`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_pic_url: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// A validated user write. `password` is still plaintext here.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub bio: String,
    pub profile_pic_url: String,
    pub password: Option<String>,
}

impl CreateUserRequest {
    /// Validate the profile fields; `require_password` is set for registration.
    pub fn validate(self, require_password: bool) -> Result<NewUser, AppError> {
        let first_name = required("first_name", self.first_name.as_deref())?;
        let last_name = required("last_name", self.last_name.as_deref())?;
        let email = required("email", self.email.as_deref())?.to_lowercase();
        if !is_valid_email(&email) {
            return Err(AppError::Validation(
                "\"email\" must be a valid email".to_string(),
            ));
        }

        let profile_pic_url = self.profile_pic_url.unwrap_or_default().trim().to_string();
        if !profile_pic_url.is_empty() && !is_valid_url(&profile_pic_url) {
            return Err(AppError::Validation(
                "\"profile_pic_url\" must be a valid uri".to_string(),
            ));
        }

        let password = match self.password {
            Some(p) => {
                check_password("password", &p)?;
                Some(p)
            }
            None if require_password => {
                return Err(AppError::Validation("\"password\" is required".to_string()))
            }
            None => None,
        };

        Ok(NewUser {
            first_name,
            last_name,
            email,
            bio: self.bio.unwrap_or_default().trim().to_string(),
            profile_pic_url,
            password,
        })
    }
}

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for `PUT /api/auth/change-password`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl ChangePasswordRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        required("email", Some(&self.email))?;
        required("current_password", Some(&self.current_password))?;
        check_password("new_password", &self.new_password)?;
        if self.confirm_password != self.new_password {
            return Err(AppError::Validation(
                "\"confirm_password\" must match \"new_password\"".to_string(),
            ));
        }
        Ok(())
    }
}

/// Payload returned by the auth endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthPayload {
    pub user: User,
}

fn required(field: &str, value: Option<&str>) -> Result<String, AppError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        Some(_) => Err(AppError::Validation(format!(
            "\"{}\" is not allowed to be empty",
            field
        ))),
        None => Err(AppError::Validation(format!("\"{}\" is required", field))),
    }
}

fn check_password(field: &str, password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "\"{}\" length must be at least {} characters long",
            field, MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// `local@domain.tld` with no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

fn is_valid_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    matches!(rest, Some(r) if !r.is_empty() && !r.chars().any(char::is_whitespace))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateUserRequest {
        CreateUserRequest {
            first_name: Some(" Ada ".to_string()),
            last_name: Some("Lovelace".to_string()),
            email: Some("Ada@Example.COM".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_normalizes_email() {
        let user = request().validate(false).unwrap();
        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.bio, "");
        assert!(user.password.is_none());
    }

    #[test]
    fn test_validate_requires_password_for_registration() {
        let err = request().validate(true).unwrap_err();
        assert_eq!(err.message(), "\"password\" is required");

        let err = CreateUserRequest {
            password: Some("abc".to_string()),
            ..request()
        }
        .validate(true)
        .unwrap_err();
        assert!(err.message().contains("at least 6"));
    }

    #[test]
    fn test_validate_rejects_bad_profile_url() {
        let err = CreateUserRequest {
            profile_pic_url: Some("not a url".to_string()),
            ..request()
        }
        .validate(false)
        .unwrap_err();
        assert!(err.message().contains("profile_pic_url"));
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a b@c.de"));
        assert!(!is_valid_email("a@@b.co"));
    }

    #[test]
    fn test_change_password_confirmation() {
        let req = ChangePasswordRequest {
            email: "a@b.co".to_string(),
            current_password: "secret1".to_string(),
            new_password: "secret2".to_string(),
            confirm_password: "secret3".to_string(),
        };
        assert!(req.validate().is_err());

        let req = ChangePasswordRequest {
            confirm_password: "secret2".to_string(),
            ..req
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_user_serialization_has_no_password() {
        let user = User {
            id: "u1".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            bio: String::new(),
            profile_pic_url: String::new(),
            created_at: "2024-01-01T00:00:00.000000Z".to_string(),
            updated_at: "2024-01-01T00:00:00.000000Z".to_string(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["_id"], "u1");
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
    }
}
