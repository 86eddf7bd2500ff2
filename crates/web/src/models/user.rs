//! User models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use omnimarket_core::{Email, UserId};

/// A registered shop user.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: Email,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Name shown in the header and on the account page.
    #[must_use]
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            _ => self.username.clone(),
        }
    }
}

/// The logged-in user, as stored in the session.
///
/// Kept deliberately small: enough to render the header and authorize
/// cart/order/review operations without a user lookup per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.as_str().to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: Option<&str>, last: Option<&str>) -> User {
        User {
            id: UserId::new(1),
            username: "kasia".to_owned(),
            email: Email::parse("kasia@example.com").expect("valid email"),
            first_name: first.map(str::to_owned),
            last_name: last.map(str::to_owned),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_display_name_prefers_full_name() {
        assert_eq!(user(Some("Kasia"), Some("Nowak")).display_name(), "Kasia Nowak");
        assert_eq!(user(Some("Kasia"), None).display_name(), "Kasia");
        assert_eq!(user(None, None).display_name(), "kasia");
    }
}
