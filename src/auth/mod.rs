/*!
 * # Users and identity
 *
 * The user directory is a fixed list of hospital service users. There are no
 * credentials and no server-side login state: every request names its acting
 * user with the `x-user-id` header, resolved by the [`ActingUser`] extractor.
 */

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::debug;

use crate::errors::ApiError;
use crate::models::UserProfile;
use crate::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Immutable set of known users.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    users: Vec<UserProfile>,
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::default_users()
    }
}

impl UserDirectory {
    pub fn new(users: Vec<UserProfile>) -> Self {
        Self { users }
    }

    /// The five service users the hospital operates with.
    pub fn default_users() -> Self {
        Self::new(vec![
            UserProfile::new("USR01", "Ana García", "ana.garcia@hospital.com", "Pacientes Piso 1"),
            UserProfile::new(
                "USR02",
                "Luis Hernández",
                "luis.hernandez@hospital.com",
                "Comedor Empleados",
            ),
            UserProfile::new(
                "USR03",
                "María Martínez",
                "maria.martinez@hospital.com",
                "Terapia Intensiva",
            ),
            UserProfile::new("USR04", "José Rodríguez", "jose.rodriguez@hospital.com", "Pediatría"),
            UserProfile::new(
                "USR05",
                "Sofía Pérez",
                "sofia.perez@hospital.com",
                "Cirugía Ambulatoria",
            ),
        ])
    }

    pub fn get(&self, user_id: &str) -> Option<&UserProfile> {
        self.users.iter().find(|user| user.user_id == user_id)
    }

    pub fn all(&self) -> &[UserProfile] {
        &self.users
    }
}

/// Acting user resolved from the `x-user-id` header.
#[derive(Debug, Clone)]
pub struct ActingUser(pub UserProfile);

#[async_trait]
impl FromRequestParts<AppState> for ActingUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ApiError::Unauthorized(format!("missing {} header", USER_ID_HEADER)))?;

        let user = state
            .users
            .get(user_id)
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized(format!("unknown user {}", user_id)))?;

        debug!(user_id = %user.user_id, "Acting user resolved");
        Ok(ActingUser(user))
    }
}
