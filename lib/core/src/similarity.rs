//! Course similarity lookup pipeline
//!
//! Resolves a free-text query through a four-stage fallback chain, terminal
//! in every branch:
//!
//! 1. substring match on the index titles -> rank the matched row's
//!    similarity scores
//! 2. substring match on author names -> that author's courses, catalog
//!    order
//! 3. catalog-wide title search -> popularity order, truncated
//! 4. not found -> explicit signal carrying the default popularity table
//!
//! Each stage is an explicit branch of [`Recommendation`]; no stage is
//! driven by error interception. All scans are linear over artifacts that
//! were normalized once at load time.

use serde::{Deserialize, Serialize};

use crate::catalog::{Course, CourseCatalog, CourseIndex, PopularCourse};
use crate::error::{Error, Result};

/// Maximum results for the catalog-wide text fallback.
pub const TEXT_FALLBACK_LIMIT: usize = 6;

/// Precomputed pairwise similarity scores between index titles.
///
/// Row/column i corresponds to title i of the [`CourseIndex`]. Symmetric in
/// practice but not enforced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    rows: Vec<Vec<f32>>,
}

impl SimilarityMatrix {
    /// Validate squareness and wrap the raw rows.
    pub fn new(rows: Vec<Vec<f32>>) -> Result<Self> {
        let dim = rows.len();
        if let Some(bad) = rows.iter().find(|r| r.len() != dim) {
            return Err(Error::DimensionMismatch {
                titles: dim,
                rows: dim,
                cols: bad.len(),
            });
        }
        Ok(Self { rows })
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn row(&self, i: usize) -> Option<&[f32]> {
        self.rows.get(i).map(Vec::as_slice)
    }
}

/// A recommended course joined with its similarity score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredCourse {
    pub course: Course,
    pub score: f32,
}

/// Terminal outcome of the query-resolution state machine.
///
/// `NotFound` is a signal, not an empty success: it carries the popularity
/// table because the calling layer renders the message and the default
/// content together.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    /// Primary path: an index title matched; `courses` are the top-k most
    /// similar other titles, score descending.
    Similar {
        matched_title: String,
        courses: Vec<ScoredCourse>,
    },
    /// Author fallback: plain catalog order, no similarity ranking.
    ByAuthor { author: String, courses: Vec<Course> },
    /// Free-text fallback: popularity order, at most
    /// [`TEXT_FALLBACK_LIMIT`] results.
    ByTitleText { courses: Vec<Course> },
    /// All stages exhausted.
    NotFound { popular: Vec<PopularCourse> },
}

/// The similarity lookup pipeline over its immutable artifacts.
#[derive(Debug, Clone)]
pub struct Recommender {
    index: CourseIndex,
    matrix: SimilarityMatrix,
    catalog: CourseCatalog,
    popular: Vec<PopularCourse>,
}

impl Recommender {
    /// Pair the title index with its similarity matrix and the display
    /// catalog.
    ///
    /// The matrix dimension must equal the de-duplicated index length. The
    /// index usually covers a subset of the catalog; the catalog-wide text
    /// fallback exists for titles outside it.
    pub fn new(
        index: CourseIndex,
        matrix: SimilarityMatrix,
        catalog: CourseCatalog,
        popular: Vec<PopularCourse>,
    ) -> Result<Self> {
        if matrix.dim() != index.len() {
            return Err(Error::DimensionMismatch {
                titles: index.len(),
                rows: matrix.dim(),
                cols: matrix.dim(),
            });
        }
        Ok(Self {
            index,
            matrix,
            catalog,
            popular,
        })
    }

    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &CourseCatalog {
        &self.catalog
    }

    #[inline]
    #[must_use]
    pub fn popular(&self) -> &[PopularCourse] {
        &self.popular
    }

    /// Resolve a query to at most `k` recommendations.
    ///
    /// Pure function of the query and the loaded artifacts.
    #[must_use]
    pub fn recommend(&self, query: &str, k: usize) -> Recommendation {
        let query = query.trim();

        if let Some(row) = self.index.find_title(query) {
            return self.similar_to_row(row, k);
        }

        if let Some(author) = self.catalog.find_author(query) {
            let author = author.to_string();
            let courses = self.catalog.courses_by_author(&author);
            return Recommendation::ByAuthor { author, courses };
        }

        let courses = self.catalog.search_titles(query, TEXT_FALLBACK_LIMIT);
        if !courses.is_empty() {
            return Recommendation::ByTitleText { courses };
        }

        Recommendation::NotFound {
            popular: self.popular.clone(),
        }
    }

    /// Rank every other row by the matched row's similarity scores.
    ///
    /// Stable descending sort, so equal scores keep original row order.
    /// The matched row never recommends itself. Index titles missing from
    /// the catalog fall back to bare metadata rather than being dropped,
    /// so k results stay k results.
    fn similar_to_row(&self, row: usize, k: usize) -> Recommendation {
        let matched_title = self.index.title_at(row).unwrap_or_default().to_string();

        let Some(scores) = self.matrix.row(row) else {
            return Recommendation::NotFound {
                popular: self.popular.clone(),
            };
        };

        let mut ranked: Vec<usize> = (0..scores.len()).filter(|i| *i != row).collect();
        ranked.sort_by(|a, b| {
            scores[*b]
                .partial_cmp(&scores[*a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(k);

        let courses = ranked
            .into_iter()
            .filter_map(|i| {
                let title = self.index.title_at(i)?;
                let course = match self.catalog.course_for_title(title) {
                    Some(c) => c.clone(),
                    None => Course {
                        title: title.to_string(),
                        author: String::new(),
                        price: 0.0,
                        num_subscribers: 0,
                        image_url: String::new(),
                    },
                };
                Some(ScoredCourse {
                    course,
                    score: scores[i],
                })
            })
            .collect();

        Recommendation::Similar {
            matched_title,
            courses,
        }
    }
}

/// Handle the web layer holds: loaded pipeline or unavailable sentinel,
/// same degrade policy as the classifier.
#[derive(Debug, Clone)]
pub enum RecommenderHandle {
    Loaded(Recommender),
    Unavailable,
}

impl RecommenderHandle {
    #[inline]
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    #[inline]
    #[must_use]
    pub fn get(&self) -> Option<&Recommender> {
        match self {
            Self::Loaded(r) => Some(r),
            Self::Unavailable => None,
        }
    }
}
