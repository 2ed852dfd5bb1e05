//! Cache value type for CMS responses.

use super::{BlogPost, NewsItem, Offer, Page, Project};

/// Union of cacheable CMS documents.
///
/// One moka cache holds every document kind; the key prefix disambiguates
/// (`page:`, `post:`, `posts`, `projects`, `offers`, `news`).
#[derive(Debug, Clone)]
pub enum CacheValue {
    Page(Box<Page>),
    Post(Box<BlogPost>),
    Posts(Vec<BlogPost>),
    Projects(Vec<Project>),
    Offers(Vec<Offer>),
    News(Vec<NewsItem>),
}
