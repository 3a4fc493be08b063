//! Records exchanged with the hosting platform.

use serde::{Deserialize, Deserializer, Serialize};

/// Accepts identifiers sent either as strings or as numbers.
fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("invalid id: {}", other))),
    }
}

/// Authenticated user profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl User {
    /// Full name, or `None` when both parts are empty.
    pub fn full_name(&self) -> Option<String> {
        let name = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        );
        let name = name.trim();
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Domain {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Website {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    pub website_type: String,
    pub domain: Domain,
}

/// Provisioning state of a remote resource.
///
/// Transitions only go from `Provisioning` to one of the terminal states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    Active,
    Error,
    /// Any status the server reports that is not terminal lands here.
    #[default]
    #[serde(other)]
    Provisioning,
}

/// A missing or null status means the resource is still being created.
fn status_or_provisioning<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<ResourceStatus, D::Error> {
    Ok(Option::<ResourceStatus>::deserialize(deserializer)?.unwrap_or_default())
}

impl ResourceStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Active | Self::Error)
    }
}

impl std::fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provisioning => write!(f, "provisioning"),
            Self::Active => write!(f, "active"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A hosted database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub db_type: String,
    #[serde(default, deserialize_with = "status_or_provisioning")]
    pub status: ResourceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Username/password pair of a provisioned database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Database {
    /// Credentials, once the platform has issued both parts.
    pub fn credentials(&self) -> Option<Credentials> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some(Credentials {
                    username: username.to_string(),
                    password: password.to_string(),
                })
            }
            _ => None,
        }
    }
}

/// Response of the deploy trigger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Deployment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_is_provisioning() {
        let db: Database =
            serde_json::from_str(r#"{"id": "1", "status": "pending"}"#).unwrap();
        assert_eq!(db.status, ResourceStatus::Provisioning);
        assert!(!db.status.is_terminal());
    }

    #[test]
    fn test_missing_or_null_status_is_provisioning() {
        let db: Database =
            serde_json::from_str(r#"{"id": 7, "name": "shop_abcdef_db", "db_type": "mysql"}"#)
                .unwrap();
        assert_eq!(db.status, ResourceStatus::Provisioning);

        let db: Database = serde_json::from_str(r#"{"id": 7, "status": null}"#).unwrap();
        assert_eq!(db.status, ResourceStatus::Provisioning);
    }

    #[test]
    fn test_terminal_statuses() {
        let db: Database = serde_json::from_str(r#"{"id": 1, "status": "error"}"#).unwrap();
        assert_eq!(db.status, ResourceStatus::Error);
        assert!(db.status.is_terminal());
    }

    #[test]
    fn test_numeric_ids_are_accepted() {
        let db: Database = serde_json::from_str(r#"{"id": 42, "status": "active"}"#).unwrap();
        assert_eq!(db.id, "42");
    }

    #[test]
    fn test_credentials_require_both_parts() {
        let mut db: Database = serde_json::from_str(
            r#"{"id": "1", "status": "active", "username": "u", "password": ""}"#,
        )
        .unwrap();
        assert!(db.credentials().is_none());

        db.password = Some("p".into());
        assert_eq!(
            db.credentials(),
            Some(Credentials {
                username: "u".into(),
                password: "p".into()
            })
        );
    }

    #[test]
    fn test_full_name() {
        let user = User {
            email: "a@b.c".into(),
            first_name: Some("Ada".into()),
            last_name: None,
        };
        assert_eq!(user.full_name().as_deref(), Some("Ada"));
        assert_eq!(User::default().full_name(), None);
    }
}
