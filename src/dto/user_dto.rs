use serde::Serialize;

use crate::model::user::{User, UserProfile};

/// The view of a user exposed to other callers: username and profile only.
/// Password hash, email and settings never leave the service layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUserDto {
    pub id: String,
    pub username: String,
    pub profile: UserProfile,
}

impl From<&User> for PublicUserDto {
    fn from(user: &User) -> Self {
        PublicUserDto {
            id: user
                .id
                .map(|id| id.to_hex())
                .unwrap_or_default(),
            username: user.username.clone(),
            profile: user.profile.clone(),
        }
    }
}
