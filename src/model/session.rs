use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The logged-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
}

/// An authenticated session, persisted between `ib` invocations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub logged_in_at: DateTime<Utc>,
}
