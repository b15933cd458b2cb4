//! Course catalog, title index, and popularity table
//!
//! All three are immutable artifacts loaded once at startup. Text
//! normalization (lowercased titles and author names) happens here at build
//! time so that request handling never re-normalizes the catalog.
//!
//! The [`CourseIndex`] is the ordered, de-duplicated title list the
//! similarity matrix was computed over; it usually covers a subset of the
//! full catalog.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One row of the course catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Course {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub price: f64,
    /// Popularity count (enrolled subscribers).
    #[serde(default)]
    pub num_subscribers: u64,
    #[serde(default)]
    pub image_url: String,
}

/// Entry of the precomputed top-N popularity table, with the aggregate
/// rating fields the default landing page displays.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PopularCourse {
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub avg_rating: f64,
    #[serde(default)]
    pub total_votes: u64,
    #[serde(default)]
    pub image_url: String,
}

/// Ordered, de-duplicated title list with a title-to-row map.
///
/// Row i here corresponds to row/column i of the similarity matrix.
#[derive(Debug, Clone)]
pub struct CourseIndex {
    titles: Vec<String>,
    titles_lower: Vec<String>,
    by_title: AHashMap<String, usize>,
}

impl CourseIndex {
    /// Build from the raw title sequence, dropping duplicates and keeping
    /// first-seen order.
    pub fn from_titles(raw: Vec<String>) -> Result<Self> {
        if raw.is_empty() {
            return Err(Error::InvalidInput("title index is empty".to_string()));
        }

        let mut titles = Vec::new();
        let mut titles_lower = Vec::new();
        let mut by_title = AHashMap::new();

        for title in raw {
            if !by_title.contains_key(&title) {
                by_title.insert(title.clone(), titles.len());
                titles_lower.push(title.to_lowercase());
                titles.push(title);
            }
        }

        Ok(Self {
            titles,
            titles_lower,
            by_title,
        })
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Row index of an exact title, if present.
    #[inline]
    pub fn row_of(&self, title: &str) -> Option<usize> {
        self.by_title.get(title).copied()
    }

    /// Title at a given row index.
    #[inline]
    pub fn title_at(&self, row: usize) -> Option<&str> {
        self.titles.get(row).map(String::as_str)
    }

    /// First title containing `query` case-insensitively, in index order.
    ///
    /// First match wins; iteration order is index order, not relevance.
    pub fn find_title(&self, query: &str) -> Option<usize> {
        let needle = query.to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.titles_lower.iter().position(|t| t.contains(&needle))
    }
}

/// The full course table with author scans and the popularity-ordered text
/// search used by the fallback stages.
#[derive(Debug, Clone)]
pub struct CourseCatalog {
    courses: Vec<Course>,
    /// Lowercased titles parallel to `courses`.
    titles_lower: Vec<String>,
    /// Distinct author names in first-seen order, with lowercased copies
    /// parallel by index.
    authors: Vec<String>,
    authors_lower: Vec<String>,
}

impl CourseCatalog {
    pub fn new(courses: Vec<Course>) -> Result<Self> {
        if courses.is_empty() {
            return Err(Error::InvalidInput("catalog is empty".to_string()));
        }

        let titles_lower = courses.iter().map(|c| c.title.to_lowercase()).collect();

        let mut authors = Vec::new();
        let mut authors_lower = Vec::new();
        let mut seen = AHashSet::new();
        for course in &courses {
            if seen.insert(course.author.clone()) {
                authors_lower.push(course.author.to_lowercase());
                authors.push(course.author.clone());
            }
        }

        Ok(Self {
            courses,
            titles_lower,
            authors,
            authors_lower,
        })
    }

    /// First distinct author containing `query` case-insensitively.
    pub fn find_author(&self, query: &str) -> Option<&str> {
        let needle = query.to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.authors_lower
            .iter()
            .position(|a| a.contains(&needle))
            .map(|i| self.authors[i].as_str())
    }

    /// All courses by an author, catalog order, de-duplicated by title.
    pub fn courses_by_author(&self, author: &str) -> Vec<Course> {
        let mut seen = AHashSet::new();
        self.courses
            .iter()
            .filter(|c| c.author == author)
            .filter(|c| seen.insert(c.title.clone()))
            .cloned()
            .collect()
    }

    /// Catalog-wide substring search on titles.
    ///
    /// Results are de-duplicated by title, ordered by descending subscriber
    /// count, and truncated to `limit`.
    pub fn search_titles(&self, query: &str, limit: usize) -> Vec<Course> {
        let needle = query.to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut seen = AHashSet::new();
        let mut matches: Vec<Course> = self
            .courses
            .iter()
            .zip(self.titles_lower.iter())
            .filter(|(_, title)| title.contains(&needle))
            .map(|(course, _)| course)
            .filter(|c| seen.insert(c.title.clone()))
            .cloned()
            .collect();

        matches.sort_by(|a, b| b.num_subscribers.cmp(&a.num_subscribers));
        matches.truncate(limit);
        matches
    }

    /// Display metadata for a title: the first catalog row bearing it.
    pub fn course_for_title(&self, title: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.title == title)
    }

    /// All catalog rows, input order.
    #[inline]
    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }
}
