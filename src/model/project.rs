use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lower bound for the optional creation year; the upper bound is the
/// current year at validation time.
pub const MIN_PROJECT_YEAR: i32 = 1900;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub thumbnail_url: String,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub status: ProjectStatus,
    pub created_by: ObjectId,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_url: Option<String>,
    #[serde(default)]
    pub collaborators: Vec<Collaborator>,
    pub featured: bool,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// A project is never stored without a thumbnail: absent one, the
    /// original image stands in.
    pub fn ensure_thumbnail(&mut self) {
        if self.thumbnail_url.is_empty() {
            self.thumbnail_url = self.image_url.clone();
        }
    }

    /// Year must fall within [1900, current year] when present.
    pub fn is_valid_year(year: i32) -> bool {
        year >= MIN_PROJECT_YEAR && year <= Utc::now().year()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Painting,
    Sculpture,
    Photography,
    Digital,
    Illustration,
    Design,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Painting => "painting",
            Category::Sculpture => "sculpture",
            Category::Photography => "photography",
            Category::Digital => "digital",
            Category::Illustration => "illustration",
            Category::Design => "design",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "painting" => Ok(Category::Painting),
            "sculpture" => Ok(Category::Sculpture),
            "photography" => Ok(Category::Photography),
            "digital" => Ok(Category::Digital),
            "illustration" => Ok(Category::Illustration),
            "design" => Ok(Category::Design),
            "other" => Ok(Category::Other),
            other => Err(format!("Invalid category: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Draft,
    #[default]
    Published,
    Archived,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::Published => "published",
            ProjectStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ProjectStatus::Draft),
            "published" => Ok(ProjectStatus::Published),
            "archived" => Ok(ProjectStatus::Archived),
            other => Err(format!("Invalid status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default)]
    pub unit: DimensionUnit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionUnit {
    Cm,
    Inch,
    #[default]
    Px,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collaborator {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_project() -> Project {
        let now = Utc::now();
        Project {
            id: Some(ObjectId::new()),
            title: "Sunset".to_string(),
            description: "Oil on canvas".to_string(),
            image_url: "/uploads/1712345678901-abc123.jpg".to_string(),
            thumbnail_url: String::new(),
            category: Category::Painting,
            medium: Some("oil".to_string()),
            dimensions: None,
            year: Some(2021),
            status: ProjectStatus::default(),
            created_by: ObjectId::new(),
            tags: vec!["sunset".to_string(), "sea".to_string()],
            tools: vec![],
            project_url: None,
            collaborators: vec![],
            featured: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_ensure_thumbnail_falls_back_to_image() {
        let mut project = sample_project();
        project.ensure_thumbnail();
        assert_eq!(project.thumbnail_url, project.image_url);
    }

    #[test]
    fn test_ensure_thumbnail_keeps_existing_value() {
        let mut project = sample_project();
        project.thumbnail_url = "/uploads/thumb.jpg".to_string();
        project.ensure_thumbnail();
        assert_eq!(project.thumbnail_url, "/uploads/thumb.jpg");
    }

    #[test]
    fn test_status_defaults_to_published() {
        assert_eq!(ProjectStatus::default(), ProjectStatus::Published);
    }

    #[test]
    fn test_category_round_trip() {
        for name in [
            "painting",
            "sculpture",
            "photography",
            "digital",
            "illustration",
            "design",
            "other",
        ] {
            let category: Category = name.parse().unwrap();
            assert_eq!(category.as_str(), name);
        }
        assert!("watercolor".parse::<Category>().is_err());
    }

    #[test]
    fn test_year_bounds() {
        assert!(Project::is_valid_year(1900));
        assert!(Project::is_valid_year(Utc::now().year()));
        assert!(!Project::is_valid_year(1899));
        assert!(!Project::is_valid_year(Utc::now().year() + 1));
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let project = sample_project();
        let json = serde_json::to_value(&project).unwrap();
        assert!(json.get("imageUrl").is_some());
        assert!(json.get("createdBy").is_some());
        assert_eq!(json["status"], "published");
        assert_eq!(json["category"], "painting");
    }

    #[test]
    fn test_dimension_unit_defaults_to_px() {
        let dims: Dimensions = serde_json::from_str(r#"{"width": 800, "height": 600}"#).unwrap();
        assert_eq!(dims.unit, DimensionUnit::Px);
    }
}
