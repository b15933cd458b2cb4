//! # edurec
//!
//! A learning-portal recommendation service: a tabular career classifier
//! and a course-similarity lookup with a fallback chain, served over a
//! small REST surface.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! edurec --artifact-dir ./artifacts --data-dir ./data --http-port 8080
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use edurec::prelude::*;
//!
//! // Load the pre-trained artifacts (degrades per pipeline, never panics)
//! let artifacts = ArtifactStore::load("./artifacts");
//!
//! // Classify a student record
//! let features = StudentFeatures::from_slice(&[
//!     0.0, 0.0, 2.0, 1.0, 10.0, 78.0, 82.0, 69.0, 91.0, 85.0, 77.0, 88.0, 570.0, 81.4,
//! ]).unwrap();
//! let prediction = artifacts.classifier().classify(&features);
//!
//! // Look up similar courses
//! if let Some(recommender) = artifacts.recommender().get() {
//!     let result = recommender.recommend("Python", 6);
//! }
//! ```
//!
//! ## Crate Structure
//!
//! - `edurec-core` - Pipelines and domain types (features, classifier, catalog, similarity)
//! - `edurec-store` - Artifact loading, user document store, credential hashing
//! - `edurec-api` - REST routes and the template-renderer seam
//!
//! ## Design
//!
//! Both pipelines are pure functions over artifacts loaded once at process
//! start and shared read-only; every lookup failure degrades to a
//! display-safe payload instead of a process fault.

// Re-export core types
pub use edurec_core::{
    CareerClassifier, ClassifierHandle, Course, CourseCatalog, CourseIndex, Error, LabelScore,
    PopularCourse, Prediction, Recommendation, Recommender, RecommenderHandle, Result,
    ScoredCourse, SimilarityMatrix, StudentFeatures, FEATURE_COUNT, TOP_K,
};

// Re-export store
pub use edurec_store::{ArtifactStore, NewUser, UserRecord, UserStore};

// Re-export API
pub use edurec_api::{AppContext, JsonRenderer, PageRenderer, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AppContext, ArtifactStore, CareerClassifier, ClassifierHandle, Course, CourseCatalog,
        CourseIndex, Error, LabelScore, NewUser, PopularCourse, Prediction, Recommendation,
        Recommender, RecommenderHandle, RestApi, Result, ScoredCourse, SimilarityMatrix,
        StudentFeatures, UserRecord, UserStore, FEATURE_COUNT, TOP_K,
    };
}
