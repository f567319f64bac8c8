use crate::image::Image;
use crate::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Blog post as served by `GET /api/v1/blogs`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Blog {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub reading_time: Option<u32>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default, with = "crate::timestamp::option")]
    pub published_at: Option<DateTime<Utc>>,
    pub slug: String,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default, with = "crate::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub images: Vec<Image>,
}

impl Blog {
    /// Publication time, falling back to creation time for drafts.
    pub fn effective_date(&self) -> Option<DateTime<Utc>> {
        self.published_at.or(self.created_at)
    }
}

/// Page banner as served by `GET /api/v1/banners`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub id: EntityId,
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub image_url: String,
    #[serde(default)]
    pub link_url: Option<String>,
    #[serde(default)]
    pub button_text: Option<String>,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, with = "crate::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
}
