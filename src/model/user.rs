use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub username: String,
    /// Stored lowercased; uniqueness enforced by index.
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    #[serde(default)]
    pub profile: UserProfile,
    #[serde(default)]
    pub settings: UserSettings,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub avatar: String,
    pub cover_image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(default)]
    pub social_links: SocialLinks,
}

impl Default for UserProfile {
    fn default() -> Self {
        UserProfile {
            full_name: None,
            bio: None,
            avatar: "/images/default-avatar.png".to_string(),
            cover_image: "/images/default-cover.png".to_string(),
            location: None,
            specialization: None,
            social_links: SocialLinks::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dribbble: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub theme: Theme,
    pub email_notifications: bool,
    pub visibility: Visibility,
}

impl Default for UserSettings {
    fn default() -> Self {
        UserSettings {
            theme: Theme::System,
            email_notifications: true,
            visibility: Visibility::Public,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Some(ObjectId::new()),
            username: "ayu".to_string(),
            email: "ayu@example.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            is_admin: false,
            profile: UserProfile::default(),
            settings: UserSettings::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_serde_round_trip_keeps_flags() {
        let user = sample_user();
        let doc = bson::to_document(&user).unwrap();
        let back: User = bson::from_document(doc).unwrap();
        assert_eq!(back.username, user.username);
        assert!(!back.is_admin);
    }

    #[test]
    fn test_profile_defaults() {
        let profile = UserProfile::default();
        assert_eq!(profile.avatar, "/images/default-avatar.png");
        assert_eq!(profile.cover_image, "/images/default-cover.png");
        assert!(profile.full_name.is_none());
    }

    #[test]
    fn test_settings_defaults() {
        let settings = UserSettings::default();
        assert_eq!(settings.theme, Theme::System);
        assert!(settings.email_notifications);
        assert_eq!(settings.visibility, Visibility::Public);
    }

    #[test]
    fn test_settings_serde_lowercase() {
        let settings = UserSettings::default();
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["theme"], "system");
        assert_eq!(json["visibility"], "public");
    }
}
