//! Dashboard aggregation over every blog.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Months, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Blog;

pub const TOP_BLOGS: usize = 5;
pub const RECENT_BLOGS: usize = 5;
pub const TOP_TAGS: usize = 10;
pub const TRAILING_MONTHS: u32 = 6;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overview {
    pub total_blogs: u64,
    pub total_users: u64,
    pub total_views: u64,
    pub total_likes: u64,
}

/// Short form of a blog used in the dashboard rankings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogDigest {
    pub id: Uuid,
    pub title: String,
    pub views: u64,
    pub likes: u64,
    pub created_at: DateTime<Utc>,
    pub author: Uuid,
}

impl From<&Blog> for BlogDigest {
    fn from(blog: &Blog) -> Self {
        Self {
            id: blog.id,
            title: blog.title.clone(),
            views: blog.views,
            likes: blog.likes(),
            created_at: blog.created_at,
            author: blog.author,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub key: String,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCount {
    pub year: i32,
    pub month: u32,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub overview: Overview,
    pub top_by_views: Vec<BlogDigest>,
    pub top_by_likes: Vec<BlogDigest>,
    pub recent: Vec<BlogDigest>,
    /// Descending by count.
    pub categories: Vec<Bucket>,
    /// Top tags, descending by count.
    pub tags: Vec<Bucket>,
    /// Trailing months in chronological order. Months without posts are absent.
    pub per_month: Vec<MonthCount>,
}

impl DashboardStats {
    /// Compute every statistic from `blogs`, given in store order.
    ///
    /// Rankings use stable sorts, so ties keep store order.
    pub fn compute(blogs: &[Blog], total_users: u64, now: DateTime<Utc>) -> Self {
        let overview = Overview {
            total_blogs: blogs.len() as u64,
            total_users,
            total_views: blogs.iter().map(|b| b.views).sum(),
            total_likes: blogs.iter().map(Blog::likes).sum(),
        };

        let cutoff = now
            .checked_sub_months(Months::new(TRAILING_MONTHS))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let mut months: BTreeMap<(i32, u32), u64> = BTreeMap::new();
        for blog in blogs.iter().filter(|b| b.created_at >= cutoff) {
            *months
                .entry((blog.created_at.year(), blog.created_at.month()))
                .or_default() += 1;
        }

        Self {
            overview,
            top_by_views: top(blogs, TOP_BLOGS, |a, b| b.views.cmp(&a.views)),
            top_by_likes: top(blogs, TOP_BLOGS, |a, b| b.likes().cmp(&a.likes())),
            recent: top(blogs, RECENT_BLOGS, |a, b| b.created_at.cmp(&a.created_at)),
            categories: distribution(blogs.iter().map(|b| b.category.as_str()), None),
            tags: distribution(
                blogs.iter().flat_map(|b| b.tags.iter().map(String::as_str)),
                Some(TOP_TAGS),
            ),
            per_month: months
                .into_iter()
                .map(|((year, month), count)| MonthCount { year, month, count })
                .collect(),
        }
    }

    /// Distinct authors referenced by the rankings.
    pub fn author_ids(&self) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = self
            .top_by_views
            .iter()
            .chain(&self.top_by_likes)
            .chain(&self.recent)
            .map(|d| d.author)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

fn top<F>(blogs: &[Blog], n: usize, cmp: F) -> Vec<BlogDigest>
where
    F: Fn(&Blog, &Blog) -> std::cmp::Ordering,
{
    let mut ranked: Vec<&Blog> = blogs.iter().collect();
    ranked.sort_by(|a, b| cmp(*a, *b));
    ranked.into_iter().take(n).map(BlogDigest::from).collect()
}

/// Count occurrences, descending by count; ties keep first-seen order.
fn distribution<'a, I>(keys: I, limit: Option<usize>) -> Vec<Bucket>
where
    I: Iterator<Item = &'a str>,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut buckets: Vec<Bucket> = Vec::new();
    for key in keys {
        match index.get(key) {
            Some(&i) => buckets[i].count += 1,
            None => {
                index.insert(key, buckets.len());
                buckets.push(Bucket {
                    key: key.to_string(),
                    count: 1,
                });
            }
        }
    }
    buckets.sort_by(|a, b| b.count.cmp(&a.count));
    if let Some(limit) = limit {
        buckets.truncate(limit);
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BlogDraft;
    use chrono::{Duration, TimeZone};

    fn blog(category: &str, tags: &[&str], views: u64, likes: usize) -> Blog {
        let mut blog = Blog::new(
            Uuid::new_v4(),
            BlogDraft {
                title: format!("{category} {views}"),
                content: "body".to_string(),
                category: category.to_string(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                cover_image: None,
            },
        )
        .unwrap();
        blog.views = views;
        for _ in 0..likes {
            blog.toggle_like(Uuid::new_v4());
        }
        blog
    }

    #[test]
    fn test_empty_store_yields_zeros() {
        let stats = DashboardStats::compute(&[], 3, Utc::now());

        assert_eq!(stats.overview.total_blogs, 0);
        assert_eq!(stats.overview.total_users, 3);
        assert_eq!(stats.overview.total_views, 0);
        assert_eq!(stats.overview.total_likes, 0);
        assert!(stats.top_by_views.is_empty());
        assert!(stats.categories.is_empty());
        assert!(stats.tags.is_empty());
        assert!(stats.per_month.is_empty());
    }

    #[test]
    fn test_totals_and_rankings() {
        let blogs: Vec<Blog> = (0..7)
            .map(|i| blog("c", &[], i * 10, (7 - i) as usize))
            .collect();

        let stats = DashboardStats::compute(&blogs, 1, Utc::now());

        assert_eq!(stats.overview.total_blogs, 7);
        assert_eq!(stats.overview.total_views, (0..7).map(|i| i * 10).sum::<u64>());
        assert_eq!(stats.overview.total_likes, (1..=7).sum::<u64>());

        let views: Vec<u64> = stats.top_by_views.iter().map(|d| d.views).collect();
        assert_eq!(views, vec![60, 50, 40, 30, 20]);
        let likes: Vec<u64> = stats.top_by_likes.iter().map(|d| d.likes).collect();
        assert_eq!(likes, vec![7, 6, 5, 4, 3]);
        assert_eq!(stats.recent.len(), RECENT_BLOGS);
    }

    #[test]
    fn test_ties_keep_store_order() {
        let blogs = vec![blog("a", &[], 5, 0), blog("b", &[], 5, 0)];

        let stats = DashboardStats::compute(&blogs, 0, Utc::now());

        assert_eq!(stats.top_by_views[0].id, blogs[0].id);
        assert_eq!(stats.top_by_views[1].id, blogs[1].id);
    }

    #[test]
    fn test_category_and_tag_distribution() {
        let mut blogs = vec![
            blog("Design", &["ui", "ux", "css"], 0, 0),
            blog("Technology", &["rust", "ui"], 0, 0),
            blog("Technology", &["rust"], 0, 0),
        ];
        for i in 0..12 {
            blogs.push(blog("Research", &[format!("t{i}").as_str()], 0, 0));
        }

        let stats = DashboardStats::compute(&blogs, 0, Utc::now());

        assert_eq!(stats.categories[0].key, "Research");
        assert_eq!(stats.categories[0].count, 12);
        assert_eq!(stats.categories[1].key, "Technology");
        assert_eq!(stats.categories[1].count, 2);
        assert_eq!(stats.categories[2].key, "Design");

        assert_eq!(stats.tags.len(), TOP_TAGS);
        assert_eq!(stats.tags[0].key, "ui");
        assert_eq!(stats.tags[0].count, 2);
        assert_eq!(stats.tags[1].key, "rust");
        assert_eq!(stats.tags[1].count, 2);
    }

    #[test]
    fn test_monthly_counts_trailing_window_without_zero_fill() {
        let now = Utc.with_ymd_and_hms(2024, 8, 15, 12, 0, 0).unwrap();
        let at = |y, m, d| Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap();

        let mut blogs = Vec::new();
        for created in [
            at(2024, 1, 10),
            at(2024, 2, 14),
            at(2024, 2, 20),
            at(2024, 3, 1),
            at(2024, 3, 2),
            at(2024, 6, 30),
            at(2024, 8, 1),
        ] {
            let mut b = blog("c", &[], 0, 0);
            b.created_at = created;
            blogs.push(b);
        }
        let mut too_old = blog("c", &[], 0, 0);
        too_old.created_at = now - Duration::days(400);
        blogs.push(too_old);

        let stats = DashboardStats::compute(&blogs, 0, now);

        assert_eq!(
            stats.per_month,
            vec![
                MonthCount { year: 2024, month: 2, count: 1 },
                MonthCount { year: 2024, month: 3, count: 2 },
                MonthCount { year: 2024, month: 6, count: 1 },
                MonthCount { year: 2024, month: 8, count: 1 },
            ]
        );
    }

    #[test]
    fn test_author_ids_are_distinct() {
        let mut first = blog("c", &[], 1, 0);
        let mut second = blog("c", &[], 2, 0);
        let shared = Uuid::new_v4();
        first.author = shared;
        second.author = shared;

        let stats = DashboardStats::compute(&[first, second], 0, Utc::now());

        assert_eq!(stats.author_ids(), vec![shared]);
    }
}
