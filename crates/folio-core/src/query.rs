//! Query builder - turns raw listing parameters into a typed blog query.
//!
//! The builder is pure: it parses, defaults and validates the request and yields a
//! [`BlogQuery`] (filter, sort, page). Store adapters translate that query into their own
//! dialect; [`BlogQuery::run`] evaluates it over an in-memory slice with identical
//! semantics.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Blog;
use crate::error::DomainError;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// Listing parameters exactly as received on the query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogQueryParams {
    pub search: Option<String>,
    pub category: Option<String>,
    /// Comma-separated, e.g. `"tech, ai"`.
    pub tags: Option<String>,
    pub author: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Every recognized filter clause. Present clauses are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogFilter {
    /// Case-insensitive substring of title OR content.
    pub search: Option<String>,
    /// Exact match.
    pub category: Option<String>,
    /// Blog matches when any of its tags is in this set. Empty means no clause.
    pub tags: Vec<String>,
    /// Exact match on the owner.
    pub author: Option<Uuid>,
}

impl BlogFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.category.is_none()
            && self.tags.is_empty()
            && self.author.is_none()
    }

    pub fn matches(&self, blog: &Blog) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !blog.title.to_lowercase().contains(&needle)
                && !blog.content.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if blog.category != *category {
                return false;
            }
        }
        if !self.tags.is_empty() && !blog.has_any_tag(&self.tags) {
            return false;
        }
        if let Some(author) = self.author {
            if blog.author != author {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    Views,
    Likes,
    Title,
}

impl SortField {
    /// Accepts the camelCase wire names and their snake_case spellings.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "createdAt" | "created_at" => Some(Self::CreatedAt),
            "updatedAt" | "updated_at" => Some(Self::UpdatedAt),
            "views" => Some(Self::Views),
            "likes" => Some(Self::Likes),
            "title" => Some(Self::Title),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlogSort {
    pub field: SortField,
    pub order: SortOrder,
}

impl Default for BlogSort {
    /// Newest first.
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            order: SortOrder::Desc,
        }
    }
}

impl BlogSort {
    pub fn compare(&self, a: &Blog, b: &Blog) -> Ordering {
        let ordering = match self.field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::Views => a.views.cmp(&b.views),
            SortField::Likes => a.likes().cmp(&b.likes()),
            SortField::Title => a.title.cmp(&b.title),
        };
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Zero values fall back to the defaults.
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: if page == 0 { DEFAULT_PAGE } else { page },
            limit: if limit == 0 { DEFAULT_LIMIT } else { limit },
        }
    }

    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// A fully resolved listing query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogQuery {
    pub filter: BlogFilter,
    pub sort: BlogSort,
    pub page: PageRequest,
}

/// One page of matching blogs plus the total number of matches.
#[derive(Debug, Clone, Default)]
pub struct BlogPage {
    pub blogs: Vec<Blog>,
    pub total: u64,
}

impl BlogQuery {
    /// Build a query from raw parameters.
    ///
    /// Pagination never fails; an author that is not a valid id does.
    pub fn from_params(params: &BlogQueryParams) -> Result<Self, DomainError> {
        let filter = BlogFilter {
            search: non_empty(params.search.as_deref()),
            category: non_empty(params.category.as_deref()),
            tags: params.tags.as_deref().map(split_tags).unwrap_or_default(),
            author: non_empty(params.author.as_deref())
                .map(|raw| {
                    Uuid::parse_str(&raw)
                        .map_err(|_| DomainError::Validation(format!("Invalid author id: {raw}")))
                })
                .transpose()?,
        };

        let sort = match params.sort_by.as_deref().and_then(SortField::parse) {
            Some(field) => BlogSort {
                field,
                order: if params.order.as_deref() == Some("asc") {
                    SortOrder::Asc
                } else {
                    SortOrder::Desc
                },
            },
            None => BlogSort::default(),
        };

        let page = PageRequest {
            page: parse_positive(params.page.as_deref()).unwrap_or(DEFAULT_PAGE),
            limit: parse_positive(params.limit.as_deref()).unwrap_or(DEFAULT_LIMIT),
        };

        Ok(Self { filter, sort, page })
    }

    /// Evaluate the query over blogs held in memory, in store order.
    ///
    /// The sort is stable, so ties keep store order.
    pub fn run<'a, I>(&self, blogs: I) -> BlogPage
    where
        I: IntoIterator<Item = &'a Blog>,
    {
        let mut matching: Vec<&Blog> = blogs
            .into_iter()
            .filter(|blog| self.filter.matches(blog))
            .collect();
        matching.sort_by(|a, b| self.sort.compare(a, b));

        let total = matching.len() as u64;
        let skip = usize::try_from(self.page.skip()).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.page.limit).unwrap_or(usize::MAX);

        BlogPage {
            blogs: matching.into_iter().skip(skip).take(limit).cloned().collect(),
            total,
        }
    }
}

/// Pagination metadata returned next to a page of blogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_blogs: u64,
    pub limit: u64,
}

impl PageMeta {
    pub fn new(page: PageRequest, total: u64) -> Self {
        Self {
            current_page: page.page,
            total_pages: total.div_ceil(page.limit),
            total_blogs: total,
            limit: page.limit,
        }
    }
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whole-string integers only: `"2abc"` and `"2.5"` are rejected, not truncated.
fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BlogDraft;
    use chrono::{Duration, Utc};

    fn blog(title: &str, content: &str, category: &str, tags: &[&str]) -> Blog {
        Blog::new(
            Uuid::new_v4(),
            BlogDraft {
                title: title.to_string(),
                content: content.to_string(),
                category: category.to_string(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                cover_image: None,
            },
        )
        .unwrap()
    }

    fn params() -> BlogQueryParams {
        BlogQueryParams::default()
    }

    #[test]
    fn test_defaults_when_params_missing() {
        let query = BlogQuery::from_params(&params()).unwrap();

        assert!(query.filter.is_empty());
        assert_eq!(query.sort, BlogSort::default());
        assert_eq!(query.page, PageRequest::new(1, 10));
        assert_eq!(query.page.skip(), 0);
    }

    #[test]
    fn test_invalid_pagination_falls_back_to_defaults() {
        for (page, limit) in [("abc", "x"), ("0", "0"), ("-3", "-1"), ("", " "), ("2abc", "2.5")] {
            let query = BlogQuery::from_params(&BlogQueryParams {
                page: Some(page.to_string()),
                limit: Some(limit.to_string()),
                ..params()
            })
            .unwrap();

            assert_eq!(query.page.page, DEFAULT_PAGE, "page input {page:?}");
            assert_eq!(query.page.limit, DEFAULT_LIMIT, "limit input {limit:?}");
        }
    }

    #[test]
    fn test_skip_is_page_offset() {
        for (page, limit) in [(1u64, 1u64), (2, 10), (7, 3), (4, 25)] {
            let query = BlogQuery::from_params(&BlogQueryParams {
                page: Some(page.to_string()),
                limit: Some(limit.to_string()),
                ..params()
            })
            .unwrap();

            assert_eq!(query.page.skip(), (page - 1) * limit);
        }
    }

    #[test]
    fn test_page_meta_rounds_total_pages_up() {
        assert_eq!(PageMeta::new(PageRequest::new(1, 10), 0).total_pages, 0);
        assert_eq!(PageMeta::new(PageRequest::new(1, 10), 10).total_pages, 1);
        assert_eq!(PageMeta::new(PageRequest::new(2, 10), 11).total_pages, 2);
        assert_eq!(PageMeta::new(PageRequest::new(1, 3), 7).total_pages, 3);

        let meta = PageMeta::new(PageRequest::new(3, 4), 9);
        assert_eq!(meta.current_page, 3);
        assert_eq!(meta.total_blogs, 9);
        assert_eq!(meta.limit, 4);
    }

    #[test]
    fn test_tags_are_split_and_trimmed() {
        let query = BlogQuery::from_params(&BlogQueryParams {
            tags: Some("tech, ai ,,".to_string()),
            ..params()
        })
        .unwrap();

        assert_eq!(query.filter.tags, vec!["tech".to_string(), "ai".to_string()]);
    }

    #[test]
    fn test_tag_filter_uses_or_semantics() {
        let query = BlogQuery::from_params(&BlogQueryParams {
            tags: Some("tech, ai".to_string()),
            ..params()
        })
        .unwrap();

        assert!(query.filter.matches(&blog("t", "c", "x", &["ai"])));
        assert!(query.filter.matches(&blog("t", "c", "x", &["tech", "web"])));
        assert!(!query.filter.matches(&blog("t", "c", "x", &["AI"])));
        assert!(!query.filter.matches(&blog("t", "c", "x", &[])));
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let query = BlogQuery::from_params(&BlogQueryParams {
            search: Some("hello".to_string()),
            ..params()
        })
        .unwrap();

        let by_title = blog("Hello world", "body", "x", &[]);
        let by_content = blog("Greeting", "say hello", "x", &[]);
        let neither = blog("Bye", "farewell", "x", &[]);

        let page = query.run([&by_title, &by_content, &neither]);
        let ids: Vec<Uuid> = page.blogs.iter().map(|b| b.id).collect();

        assert_eq!(page.total, 2);
        assert!(ids.contains(&by_title.id));
        assert!(ids.contains(&by_content.id));
        assert!(!ids.contains(&neither.id));
    }

    #[test]
    fn test_search_treats_pattern_characters_literally() {
        let query = BlogQuery::from_params(&BlogQueryParams {
            search: Some("c++".to_string()),
            ..params()
        })
        .unwrap();

        assert!(query.filter.matches(&blog("Modern C++", "x", "x", &[])));
        assert!(!query.filter.matches(&blog("Modern C", "x", "x", &[])));
    }

    #[test]
    fn test_clauses_are_anded() {
        let author = Uuid::new_v4();
        let mut mine = blog("Rust tips", "x", "Technology", &["rust"]);
        mine.author = author;
        let mut other_category = blog("Rust tips", "x", "Design", &["rust"]);
        other_category.author = author;
        let someone_else = blog("Rust tips", "x", "Technology", &["rust"]);

        let query = BlogQuery::from_params(&BlogQueryParams {
            search: Some("rust".to_string()),
            category: Some("Technology".to_string()),
            tags: Some("rust".to_string()),
            author: Some(author.to_string()),
            ..params()
        })
        .unwrap();

        assert!(query.filter.matches(&mine));
        assert!(!query.filter.matches(&other_category));
        assert!(!query.filter.matches(&someone_else));
    }

    #[test]
    fn test_invalid_author_is_a_validation_error() {
        let result = BlogQuery::from_params(&BlogQueryParams {
            author: Some("not-a-uuid".to_string()),
            ..params()
        });

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_sort_order_parsing() {
        let asc = BlogQuery::from_params(&BlogQueryParams {
            sort_by: Some("views".to_string()),
            order: Some("asc".to_string()),
            ..params()
        })
        .unwrap();
        assert_eq!(asc.sort.field, SortField::Views);
        assert_eq!(asc.sort.order, SortOrder::Asc);

        let other = BlogQuery::from_params(&BlogQueryParams {
            sort_by: Some("likes".to_string()),
            order: Some("ASC".to_string()),
            ..params()
        })
        .unwrap();
        assert_eq!(other.sort.order, SortOrder::Desc);

        let unknown = BlogQuery::from_params(&BlogQueryParams {
            sort_by: Some("password".to_string()),
            order: Some("asc".to_string()),
            ..params()
        })
        .unwrap();
        assert_eq!(unknown.sort, BlogSort::default());
    }

    #[test]
    fn test_run_sorts_and_paginates() {
        let now = Utc::now();
        let blogs: Vec<Blog> = (0..5)
            .map(|i| {
                let mut b = blog(&format!("post {i}"), "x", "x", &[]);
                b.created_at = now - Duration::minutes(i);
                b.views = i as u64;
                b
            })
            .collect();

        let newest_first = BlogQuery::from_params(&BlogQueryParams {
            limit: Some("2".to_string()),
            page: Some("2".to_string()),
            ..params()
        })
        .unwrap()
        .run(&blogs);
        let titles: Vec<&str> = newest_first.blogs.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["post 2", "post 3"]);
        assert_eq!(newest_first.total, 5);

        let most_viewed = BlogQuery::from_params(&BlogQueryParams {
            sort_by: Some("views".to_string()),
            limit: Some("1".to_string()),
            ..params()
        })
        .unwrap()
        .run(&blogs);
        assert_eq!(most_viewed.blogs[0].title, "post 4");
    }

    #[test]
    fn test_page_beyond_end_is_empty() {
        let blogs = vec![blog("a", "x", "x", &[])];
        let page = BlogQuery::from_params(&BlogQueryParams {
            page: Some("5".to_string()),
            ..params()
        })
        .unwrap()
        .run(&blogs);

        assert!(page.blogs.is_empty());
        assert_eq!(page.total, 1);
    }
}
