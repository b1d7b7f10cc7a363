//! Request/response types for auth endpoints.
//!
//! Request fields default to empty strings so a missing field reaches
//! validation and gets its field-specific message instead of a parse error.
//! Non-string scalars are coerced: `null`, `false` and `0` read as empty,
//! other numbers and `true` read as their text form.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::store::User;

#[derive(ToSchema, Deserialize, Default)]
#[serde(default)]
pub struct RegisterRequest {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(deserialize_with = "lenient_string")]
    pub password: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[derive(ToSchema, Deserialize, Default)]
#[serde(default)]
pub struct LoginRequest {
    #[serde(deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(deserialize_with = "lenient_string")]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Bool(true) => "true".to_string(),
        Value::Number(number) if number.as_f64() != Some(0.0) => number.to_string(),
        _ => String::new(),
    })
}

/// Public projection of a user record.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LogoutResponse {
    pub ok: bool,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use uuid::Uuid;

    #[test]
    fn register_request_defaults_missing_fields() -> Result<()> {
        let request: RegisterRequest = serde_json::from_str(r#"{"email":"a@b.com"}"#)?;
        assert_eq!(request.name, "");
        assert_eq!(request.email, "a@b.com");
        assert_eq!(request.password, "");
        Ok(())
    }

    #[test]
    fn register_request_coerces_scalar_fields() -> Result<()> {
        let request: RegisterRequest =
            serde_json::from_str(r#"{"name":null,"email":false,"password":123456}"#)?;
        assert_eq!(request.name, "");
        assert_eq!(request.email, "");
        assert_eq!(request.password, "123456");

        let request: LoginRequest =
            serde_json::from_str(r#"{"email":["a@b.com"],"password":0}"#)?;
        assert_eq!(request.email, "");
        assert_eq!(request.password, "");

        let request: LoginRequest = serde_json::from_str(r#"{"email":true,"password":1.5}"#)?;
        assert_eq!(request.email, "true");
        assert_eq!(request.password, "1.5");
        Ok(())
    }

    #[test]
    fn request_debug_hides_password() -> Result<()> {
        let request: LoginRequest =
            serde_json::from_str(r#"{"email":"a@b.com","password":"hunter2"}"#)?;
        assert!(!format!("{request:?}").contains("hunter2"));
        Ok(())
    }

    #[test]
    fn user_response_carries_only_public_fields() -> Result<()> {
        let user = User {
            id: Uuid::new_v4(),
            name: "Al".to_string(),
            email: "a@b.com".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
        };
        let value = serde_json::to_value(UserResponse::from(&user))?;
        let object = value.as_object().cloned().unwrap_or_default();
        let mut keys: Vec<_> = object.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["email", "id", "name"]);
        assert!(!value.to_string().contains("argon2"));
        Ok(())
    }
}
