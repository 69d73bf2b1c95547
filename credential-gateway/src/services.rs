//! Mock downstream services that consume the resolved credentials. Stand-ins
//! for real integrations; they fabricate data but read their connection
//! parameters from the injected bundle the way a real client would.

use credential_core::bundle::ServiceParams;
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
pub struct UserData {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub status: &'static str,
    pub api_url: String,
}

/// Simulated external API client.
pub struct ApiService<'a> {
    credentials: &'a ServiceParams,
}

impl<'a> ApiService<'a> {
    pub fn new(credentials: &'a ServiceParams) -> Self {
        Self { credentials }
    }

    pub async fn get_user_data(&self, user_id: &str) -> UserData {
        UserData {
            user_id: user_id.to_string(),
            name: format!("User {user_id}"),
            email: format!("user{user_id}@example.com"),
            status: "active",
            api_url: param_str(self.credentials, "url"),
        }
    }
}

#[derive(Serialize)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: &'static str,
}

/// Simulated database client.
pub struct DatabaseService<'a> {
    credentials: &'a ServiceParams,
}

impl<'a> DatabaseService<'a> {
    const MAX_ROWS: usize = 50;
    const ROLES: [&'static str; 3] = ["admin", "user", "viewer"];

    pub fn new(credentials: &'a ServiceParams) -> Self {
        Self { credentials }
    }

    pub fn database_url(&self) -> String {
        param_str(self.credentials, "url")
    }

    pub async fn query_users(&self, limit: usize) -> Vec<UserRow> {
        (0..limit.min(Self::MAX_ROWS))
            .map(|i| UserRow {
                id: format!("user_{}", i + 1),
                name: format!("User {}", i + 1),
                email: format!("user{}@example.com", i + 1),
                role: Self::ROLES[i % Self::ROLES.len()],
            })
            .collect()
    }
}

fn param_str(params: &ServiceParams, key: &str) -> String {
    params
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
