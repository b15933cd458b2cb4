//! # edurec Core
//!
//! Core library for the edurec learning portal.
//!
//! This crate provides the two inference pipelines and the domain types
//! they operate on:
//!
//! - [`StudentFeatures`] - Fixed-order feature vector for the career classifier
//! - [`CareerClassifier`] - Scaler + multinomial logistic regression, top-3 ranking
//! - [`CourseIndex`] / [`SimilarityMatrix`] - Precomputed course-similarity artifacts
//! - [`Recommender`] - Four-stage fallback lookup over the course catalog
//!
//! Both pipelines are pure functions over immutable artifacts loaded once
//! at process start; nothing here performs I/O.
//!
//! ## Example
//!
//! ```rust
//! use edurec_core::{CourseIndex, SimilarityMatrix, CourseCatalog, Course, Recommender};
//!
//! let index = CourseIndex::from_titles(vec![
//!     "Python for Data Science".to_string(),
//!     "Complete Python Bootcamp".to_string(),
//! ]).unwrap();
//! let matrix = SimilarityMatrix::new(vec![
//!     vec![1.0, 0.8],
//!     vec![0.8, 1.0],
//! ]).unwrap();
//! let catalog = CourseCatalog::new(vec![Course {
//!     title: "Python for Data Science".to_string(),
//!     author: "Jose Portilla".to_string(),
//!     price: 12.99,
//!     num_subscribers: 5000,
//!     image_url: String::new(),
//! }]).unwrap();
//!
//! let recommender = Recommender::new(index, matrix, catalog, Vec::new()).unwrap();
//! let result = recommender.recommend("Python", 5);
//! ```

pub mod catalog;
pub mod classifier;
pub mod error;
pub mod features;
pub mod similarity;

pub use catalog::{Course, CourseCatalog, CourseIndex, PopularCourse};
pub use classifier::{
    CareerClassifier, ClassifierHandle, ClassifierWeights, FeatureScaler, LabelScore, Prediction,
    TOP_K,
};
pub use error::{Error, Result};
pub use features::{StudentFeatures, FEATURE_COUNT};
pub use similarity::{
    Recommendation, Recommender, RecommenderHandle, ScoredCourse, SimilarityMatrix,
    TEXT_FALLBACK_LIMIT,
};
