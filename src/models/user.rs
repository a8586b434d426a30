use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Hospital service user. Read-only for the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub user_id: String,
    pub name: String,
    pub email: String,
    /// Service whose name is stamped on dispatch requests.
    pub service_name: String,
}

impl UserProfile {
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        service_name: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            email: email.into(),
            service_name: service_name.into(),
        }
    }
}
