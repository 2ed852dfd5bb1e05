//! GraphQL query documents for the headless CMS.
//!
//! Queries are plain strings with `$`-variables; the client sends them as
//! `{query, variables}` and deserializes the `data` object. Field names
//! follow the CMS schema (camelCase), mapped to Rust naming via serde.

/// Fetch a single static page by slug.
pub const GET_PAGE: &str = r"
query GetPage($slug: String) {
  page(filter: { slug: { eq: $slug } }) {
    slug
    title
    body
    seoDescription
  }
}
";

/// Fetch all blog posts, newest first.
pub const LIST_POSTS: &str = r"
query ListPosts {
  allArticles(orderBy: date_DESC) {
    slug
    title
    excerpt
    body
    date
    coverImage { url }
  }
}
";

/// Fetch a single blog post by slug.
pub const GET_POST: &str = r"
query GetPost($slug: String) {
  article(filter: { slug: { eq: $slug } }) {
    slug
    title
    excerpt
    body
    date
    coverImage { url }
  }
}
";

/// Fetch the project gallery.
pub const LIST_PROJECTS: &str = r"
query ListProjects {
  allProjects(orderBy: position_ASC) {
    title
    description
    images { url }
  }
}
";

/// Fetch current offers.
pub const LIST_OFFERS: &str = r"
query ListOffers {
  allOffers(orderBy: validUntil_ASC) {
    title
    description
    priceCents
    validUntil
  }
}
";

/// Fetch news (novita) entries, newest first.
pub const LIST_NEWS: &str = r"
query ListNews {
  allNews(orderBy: date_DESC) {
    title
    body
    date
  }
}
";
