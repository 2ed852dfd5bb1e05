//! Headless CMS client.
//!
//! Read-only GraphQL client for content-managed documents: static pages,
//! blog posts, projects, offers, and news entries. Responses are cached
//! with `moka` (5-minute TTL) keyed by query name + variables, so repeated
//! page views do not hammer the CMS.

mod cache;
pub mod queries;

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::CmsConfig;

use cache::CacheValue;

/// Errors that can occur when querying the CMS.
#[derive(Debug, Error)]
pub enum CmsError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The CMS returned GraphQL errors.
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// Failed to parse a response.
    #[error("Parse error: {0}")]
    Parse(String),
}

// =============================================================================
// Document types
// =============================================================================

/// A static content page (About, contacts, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub slug: String,
    pub title: String,
    pub body: String,
    pub seo_description: Option<String>,
}

/// A blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub body: String,
    pub date: NaiveDate,
    pub cover_image: Option<Image>,
}

/// A portfolio project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
}

/// A shop offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub title: String,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub valid_until: Option<NaiveDate>,
}

/// A news (novita) entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub body: String,
    pub date: NaiveDate,
}

/// A CMS-hosted image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
}

// =============================================================================
// Response envelopes
// =============================================================================

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct PageData {
    page: Option<Page>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostsData {
    all_articles: Vec<BlogPost>,
}

#[derive(Debug, Deserialize)]
struct PostData {
    article: Option<BlogPost>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectsData {
    all_projects: Vec<Project>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OffersData {
    all_offers: Vec<Offer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsData {
    all_news: Vec<NewsItem>,
}

// =============================================================================
// CmsClient
// =============================================================================

/// Client for the headless CMS GraphQL API.
///
/// Cheaply cloneable via `Arc`; documents are cached for 5 minutes.
#[derive(Clone)]
pub struct CmsClient {
    inner: Arc<CmsClientInner>,
}

struct CmsClientInner {
    client: reqwest::Client,
    endpoint: String,
    api_token: String,
    environment: Option<String>,
    cache: Cache<String, CacheValue>,
}

impl CmsClient {
    /// Create a new CMS client.
    #[must_use]
    pub fn new(config: &CmsConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300))
            .build();

        Self {
            inner: Arc::new(CmsClientInner {
                client: reqwest::Client::new(),
                endpoint: config.endpoint.clone(),
                api_token: config.api_token.expose_secret().to_string(),
                environment: config.environment.clone(),
                cache,
            }),
        }
    }

    /// Execute a GraphQL query with variables.
    async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, CmsError> {
        let body = serde_json::json!({
            "query": query,
            "variables": variables,
        });

        let mut request = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .bearer_auth(&self.inner.api_token)
            .json(&body);
        if let Some(environment) = &self.inner.environment {
            request = request.header("X-Environment", environment);
        }

        let response = request.send().await?;
        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(CmsError::GraphQl(format!(
                "HTTP {status}: {}",
                response_text.chars().take(200).collect::<String>()
            )));
        }

        let response: GraphQlResponse<T> = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse CMS response"
            );
            CmsError::Parse(e.to_string())
        })?;

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            return Err(CmsError::GraphQl(
                errors
                    .into_iter()
                    .map(|e| e.message)
                    .collect::<Vec<_>>()
                    .join("; "),
            ));
        }

        response
            .data
            .ok_or_else(|| CmsError::GraphQl("No data in response".to_string()))
    }

    /// Get a static page by slug. Returns `None` when the page does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the CMS request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn get_page(&self, slug: &str) -> Result<Option<Page>, CmsError> {
        let cache_key = page_cache_key(slug);
        if let Some(CacheValue::Page(page)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for page");
            return Ok(Some(*page));
        }

        let data: PageData = self
            .execute(queries::GET_PAGE, serde_json::json!({ "slug": slug }))
            .await?;

        if let Some(page) = &data.page {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Page(Box::new(page.clone())))
                .await;
        }

        Ok(data.page)
    }

    /// List all blog posts, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the CMS request fails.
    #[instrument(skip(self))]
    pub async fn list_posts(&self) -> Result<Vec<BlogPost>, CmsError> {
        if let Some(CacheValue::Posts(posts)) = self.inner.cache.get("posts").await {
            debug!("Cache hit for posts");
            return Ok(posts);
        }

        let data: PostsData = self
            .execute(queries::LIST_POSTS, serde_json::Value::Null)
            .await?;

        self.inner
            .cache
            .insert(
                "posts".to_string(),
                CacheValue::Posts(data.all_articles.clone()),
            )
            .await;

        Ok(data.all_articles)
    }

    /// Get a blog post by slug. Returns `None` when the post does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the CMS request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn get_post(&self, slug: &str) -> Result<Option<BlogPost>, CmsError> {
        let cache_key = post_cache_key(slug);
        if let Some(CacheValue::Post(post)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for post");
            return Ok(Some(*post));
        }

        let data: PostData = self
            .execute(queries::GET_POST, serde_json::json!({ "slug": slug }))
            .await?;

        if let Some(post) = &data.article {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Post(Box::new(post.clone())))
                .await;
        }

        Ok(data.article)
    }

    /// List the project gallery.
    ///
    /// # Errors
    ///
    /// Returns an error if the CMS request fails.
    #[instrument(skip(self))]
    pub async fn list_projects(&self) -> Result<Vec<Project>, CmsError> {
        if let Some(CacheValue::Projects(projects)) = self.inner.cache.get("projects").await {
            debug!("Cache hit for projects");
            return Ok(projects);
        }

        let data: ProjectsData = self
            .execute(queries::LIST_PROJECTS, serde_json::Value::Null)
            .await?;

        self.inner
            .cache
            .insert(
                "projects".to_string(),
                CacheValue::Projects(data.all_projects.clone()),
            )
            .await;

        Ok(data.all_projects)
    }

    /// List current offers.
    ///
    /// # Errors
    ///
    /// Returns an error if the CMS request fails.
    #[instrument(skip(self))]
    pub async fn list_offers(&self) -> Result<Vec<Offer>, CmsError> {
        if let Some(CacheValue::Offers(offers)) = self.inner.cache.get("offers").await {
            debug!("Cache hit for offers");
            return Ok(offers);
        }

        let data: OffersData = self
            .execute(queries::LIST_OFFERS, serde_json::Value::Null)
            .await?;

        self.inner
            .cache
            .insert(
                "offers".to_string(),
                CacheValue::Offers(data.all_offers.clone()),
            )
            .await;

        Ok(data.all_offers)
    }

    /// List news entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the CMS request fails.
    #[instrument(skip(self))]
    pub async fn list_news(&self) -> Result<Vec<NewsItem>, CmsError> {
        if let Some(CacheValue::News(news)) = self.inner.cache.get("news").await {
            debug!("Cache hit for news");
            return Ok(news);
        }

        let data: NewsData = self
            .execute(queries::LIST_NEWS, serde_json::Value::Null)
            .await?;

        self.inner
            .cache
            .insert("news".to_string(), CacheValue::News(data.all_news.clone()))
            .await;

        Ok(data.all_news)
    }

    /// Invalidate all cached documents (e.g. after a CMS webhook).
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

/// Cache key for a page by slug.
fn page_cache_key(slug: &str) -> String {
    format!("page:{slug}")
}

/// Cache key for a post by slug.
fn post_cache_key(slug: &str) -> String {
    format!("post:{slug}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn cache_keys_are_stable_and_distinct() {
        assert_eq!(page_cache_key("chi-siamo"), "page:chi-siamo");
        assert_eq!(post_cache_key("chi-siamo"), "post:chi-siamo");
        assert_ne!(page_cache_key("novita"), post_cache_key("novita"));
    }

    #[test]
    fn parses_page_response() {
        let body = r#"{"data":{"page":{"slug":"chi-siamo","title":"Chi siamo","body":"<p>...</p>","seoDescription":null}}}"#;
        let response: GraphQlResponse<PageData> = serde_json::from_str(body).unwrap();
        let page = response.data.unwrap().page.unwrap();
        assert_eq!(page.slug, "chi-siamo");
        assert!(page.seo_description.is_none());
    }

    #[test]
    fn parses_missing_page_as_none() {
        let body = r#"{"data":{"page":null}}"#;
        let response: GraphQlResponse<PageData> = serde_json::from_str(body).unwrap();
        assert!(response.data.unwrap().page.is_none());
    }

    #[test]
    fn parses_graphql_errors() {
        let body = r#"{"data":null,"errors":[{"message":"Field 'page' missing"}]}"#;
        let response: GraphQlResponse<PageData> = serde_json::from_str(body).unwrap();
        let errors = response.errors.unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors.first().unwrap().message.contains("page"));
    }

    #[test]
    fn parses_post_with_date() {
        let body = r#"{"data":{"article":{"slug":"forno-nuovo","title":"Forno nuovo","excerpt":null,"body":"...","date":"2024-05-12","coverImage":{"url":"https://cdn.example/f.jpg"}}}}"#;
        let response: GraphQlResponse<PostData> = serde_json::from_str(body).unwrap();
        let post = response.data.unwrap().article.unwrap();
        assert_eq!(post.date, NaiveDate::from_ymd_opt(2024, 5, 12).unwrap());
        assert_eq!(post.cover_image.unwrap().url, "https://cdn.example/f.jpg");
    }
}
