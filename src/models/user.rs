use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Name for display, falling back to the email local part
    pub fn display_name(&self) -> String {
        match self.name {
            Some(ref name) if !name.is_empty() => name.clone(),
            _ => self
                .email
                .split('@')
                .next()
                .unwrap_or(&self.email)
                .to_string(),
        }
    }

    pub fn member_since(&self) -> String {
        self.created_at.format("%b %Y").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_parses_wire_format() {
        let json = r#"{
            "id": "u-42",
            "email": "casey@example.com",
            "name": "Casey",
            "avatar": null,
            "createdAt": "2025-06-15T08:00:00Z"
        }"#;

        let user: User = serde_json::from_str(json).expect("user should parse");
        assert_eq!(user.display_name(), "Casey");
        assert_eq!(user.member_since(), "Jun 2025");
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let json = r#"{
            "id": "u-7",
            "email": "sam@example.com",
            "createdAt": "2025-06-15T08:00:00Z"
        }"#;

        let user: User = serde_json::from_str(json).expect("user should parse");
        assert_eq!(user.display_name(), "sam");
    }
}
