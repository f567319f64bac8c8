//! Blog, banner and slug helpers used by the content pages.

use crate::client::{BlogQuery, CatalogApi};
use crate::constants::{RECENT_OFFERS, RECENT_POSTS};
use crate::CatalogResult;
use medtour_types::{Banner, Blog, Offer};

/// Published posts for the blog index, with the sidebar views derived from them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlogFeed {
    posts: Vec<Blog>,
}

impl BlogFeed {
    pub fn new(posts: Vec<Blog>) -> Self {
        Self { posts }
    }

    pub async fn load<C: CatalogApi>(client: &C, query: &BlogQuery) -> CatalogResult<Self> {
        let posts = client.blogs(query).await?;
        tracing::debug!(count = posts.len(), "blog posts loaded");
        Ok(Self::new(posts))
    }

    pub fn posts(&self) -> &[Blog] {
        &self.posts
    }

    /// Distinct categories, trimmed and upper-cased, sorted.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .posts
            .iter()
            .filter_map(|post| post.category.as_deref())
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_uppercase)
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// The newest posts by publication date (creation date for drafts). Undated posts sort last.
    pub fn recent(&self) -> Vec<&Blog> {
        let mut posts: Vec<&Blog> = self.posts.iter().collect();
        posts.sort_by(|a, b| b.effective_date().cmp(&a.effective_date()));
        posts.truncate(RECENT_POSTS);
        posts
    }

    /// Posts whose category matches `category`, ignoring case and surrounding whitespace.
    pub fn in_category(&self, category: &str) -> Vec<&Blog> {
        let wanted = category.trim().to_uppercase();
        self.posts
            .iter()
            .filter(|post| {
                post.category
                    .as_deref()
                    .is_some_and(|c| c.trim().to_uppercase() == wanted)
            })
            .collect()
    }

    pub fn by_slug(&self, slug: &str) -> Option<&Blog> {
        self.posts.iter().find(|post| post.slug == slug)
    }
}

/// The newest offers by creation date for the attractions sidebar. Undated offers sort last.
pub fn recent_offers(offers: &[Offer]) -> Vec<&Offer> {
    let mut recent: Vec<&Offer> = offers.iter().collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.truncate(RECENT_OFFERS);
    recent
}

pub fn banner_by_title<'a>(banners: &'a [Banner], title: &str) -> Option<&'a Banner> {
    banners
        .iter()
        .find(|banner| banner.title.to_lowercase() == title.to_lowercase())
}

pub fn banner_by_name<'a>(banners: &'a [Banner], name: &str) -> Option<&'a Banner> {
    banners
        .iter()
        .find(|banner| banner.name.to_lowercase() == name.to_lowercase())
}

/// `"Cardiac Surgery"` -> `"cardiac-surgery"`.
pub fn to_slug(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// `"cardiac-surgery"` -> `"Cardiac Surgery"`.
pub fn slug_to_name(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Absolute URL for an uploaded file path, or `fallback` when there is none.
pub fn asset_url(api_base_url: &str, path: Option<&str>, fallback: &str) -> String {
    match path.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) if p.starts_with("http://") || p.starts_with("https://") => p.to_string(),
        Some(p) => format!("{}{}", api_base_url.trim_end_matches('/'), p),
        None => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockCatalog;
    use serde_json::json;

    fn post(id: i64, category: Option<&str>, published_at: Option<&str>, created_at: &str) -> Blog {
        serde_json::from_value(json!({
            "id": id,
            "title": format!("Post {id}"),
            "slug": format!("post-{id}"),
            "category": category,
            "published_at": published_at,
            "created_at": created_at,
            "is_published": true,
        }))
        .expect("blog fixture")
    }

    fn feed() -> BlogFeed {
        BlogFeed::new(vec![
            post(1, Some(" wellness "), Some("2025-01-05T10:00:00"), "2025-01-01T10:00:00"),
            post(2, Some("Travel"), None, "2025-03-01T10:00:00"),
            post(3, Some("WELLNESS"), Some("2025-02-01T10:00:00"), "2025-01-20T10:00:00"),
            post(4, None, Some("2024-12-01T10:00:00"), "2024-11-01T10:00:00"),
            post(5, Some("  "), Some("2025-02-10T10:00:00"), "2025-02-09T10:00:00"),
        ])
    }

    #[test]
    fn test_categories_are_trimmed_uppercased_and_unique() {
        assert_eq!(feed().categories(), vec!["TRAVEL", "WELLNESS"]);
    }

    #[test]
    fn test_recent_uses_publication_then_creation_date() {
        let feed = feed();
        let recent: Vec<i64> = feed.recent().iter().map(|p| p.id).collect();
        assert_eq!(recent, vec![2, 5, 3, 1]);
    }

    #[test]
    fn test_in_category_ignores_case() {
        let feed = feed();
        let ids: Vec<i64> = feed.in_category("Wellness").iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(feed.in_category("Visa").is_empty());
    }

    #[test]
    fn test_slug_round_trip_for_display() {
        assert_eq!(to_slug("  Cardiac   Surgery "), "cardiac-surgery");
        assert_eq!(slug_to_name("cardiac-SURGERY"), "Cardiac Surgery");
        assert_eq!(slug_to_name("knee--replacement"), "Knee Replacement");
    }

    #[test]
    fn test_banner_lookup_is_case_insensitive() {
        let banners: Vec<Banner> = serde_json::from_value(json!([
            { "id": 1, "name": "home-hero", "title": "Care Without Borders", "image_url": "/uploads/a.jpg", "position": 1, "is_active": true },
            { "id": 2, "name": "blog-top", "title": "Stories", "image_url": "/uploads/b.jpg", "position": 2, "is_active": false }
        ]))
        .expect("banner fixtures");

        assert_eq!(banner_by_title(&banners, "care without borders").map(|b| b.id), Some(1));
        assert_eq!(banner_by_name(&banners, "BLOG-TOP").map(|b| b.id), Some(2));
        assert!(banner_by_name(&banners, "about").is_none());
    }

    #[test]
    fn test_recent_offers_newest_first() {
        let offers: Vec<Offer> = serde_json::from_value(json!([
            { "id": 1, "name": "A", "created_at": "2025-09-01T10:00:00" },
            { "id": 2, "name": "B" },
            { "id": 3, "name": "C", "created_at": "2025-09-30T10:25:51.300630" },
            { "id": 4, "name": "D", "created_at": "2025-09-15T08:00:00" },
            { "id": 5, "name": "E", "created_at": "2025-08-01T08:00:00" }
        ]))
        .expect("offer fixtures");

        let ids: Vec<i64> = recent_offers(&offers).iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![3, 4, 1, 5]);
    }

    #[test]
    fn test_asset_url() {
        let base = "http://localhost:8000/";
        assert_eq!(
            asset_url(base, Some("/uploads/x.jpg"), "assets/images/blog-img.png"),
            "http://localhost:8000/uploads/x.jpg"
        );
        assert_eq!(
            asset_url(base, Some("https://cdn.example.in/x.jpg"), ""),
            "https://cdn.example.in/x.jpg"
        );
        assert_eq!(
            asset_url(base, None, "assets/images/blog-img.png"),
            "assets/images/blog-img.png"
        );
    }

    #[tokio::test]
    async fn test_load_passes_published_filter() {
        let mut draft = post(9, Some("News"), None, "2025-03-02T10:00:00");
        draft.is_published = false;
        let client = MockCatalog::default().with_blogs(vec![post(1, None, None, "2025-01-01"), draft]);

        let feed = BlogFeed::load(
            &client,
            &BlogQuery {
                published_only: true,
                ..Default::default()
            },
        )
        .await
        .expect("blogs");

        assert_eq!(feed.posts().len(), 1);
        assert!(feed.by_slug("post-1").is_some());
    }
}
