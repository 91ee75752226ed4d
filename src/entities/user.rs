//! Users of the directory

use crate::core::auth::Role;
use crate::core::entity::RecordId;
use crate::entities::lenient;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<RecordId>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub first_name: String,

    #[serde(default, deserialize_with = "lenient::string")]
    pub last_name: String,

    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: String,

    /// Stored role name ("admin" or "normal")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

crate::impl_entity!(User, "user", "users", user_id);

impl User {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: phone.into(),
            ..Self::default()
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role.as_str().to_string());
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    pub fn role(&self) -> Role {
        Role::from_stored(self.role.as_deref())
    }

    /// Field users are the only ones appointments can be assigned to
    ///
    /// Only an explicit `normal` role counts; the admin fallback does not
    /// apply here.
    pub fn is_assignable(&self) -> bool {
        self.role.as_deref() == Some("normal")
    }

    /// Phone number reduced to its digits
    pub fn phone_digits(&self) -> String {
        self.phone.chars().filter(char::is_ascii_digit).collect()
    }
}

/// Users the assignee picker offers
pub fn assignable_users(users: &[User]) -> Vec<User> {
    users.iter().filter(|u| u.is_assignable()).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_assignable_users_only_normal() {
        let users = vec![
            User::new("Asha", "Rao", "9000000001").with_role(Role::Normal),
            User::new("Admin", "One", "9000000002").with_role(Role::Admin),
            User::new("No", "Role", "9000000003"),
        ];
        let picked = assignable_users(&users);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].first_name, "Asha");
        assert_eq!(users[2].role(), Role::Admin);
    }

    #[test]
    fn test_phone_digits() {
        let user = User::new("A", "B", "+91 98765-43210");
        assert_eq!(user.phone_digits(), "919876543210");
    }

    #[test]
    fn test_deserialize_numeric_phone() {
        let user: User = serde_json::from_value(json!({
            "user_id": 3,
            "first_name": "Asha",
            "last_name": "Rao",
            "phone": 9876543210u64,
            "role": "normal"
        }))
        .unwrap();
        assert_eq!(user.phone, "9876543210");
        assert_eq!(user.full_name(), "Asha Rao");
        assert_eq!(user.email, None);
        assert!(user.is_assignable());
    }
}
