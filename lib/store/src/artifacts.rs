//! Artifact loading
//!
//! Loads the pre-trained artifacts (scaler, classifier weights, title
//! index + similarity matrix, course catalog, popularity table) from a
//! directory of JSON files, once, at process start.
//!
//! Load failure never stops the process: each pipeline degrades to its
//! `Unavailable` handle with a warning, and the web layer turns that into
//! a user-visible message.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{info, warn};

use edurec_core::{
    CareerClassifier, ClassifierHandle, ClassifierWeights, Course, CourseCatalog, CourseIndex,
    Error, FeatureScaler, PopularCourse, Recommender, RecommenderHandle, Result, SimilarityMatrix,
};

pub const SCALER_FILE: &str = "scaler.json";
pub const CLASSIFIER_FILE: &str = "classifier.json";
pub const SIMILARITY_FILE: &str = "similarity.json";
pub const CATALOG_FILE: &str = "catalog.json";
pub const POPULAR_FILE: &str = "popular.json";

/// On-disk shape of the similarity artifact: the title index and the
/// matrix computed over it, serialized together by the offline trainer.
#[derive(Debug, Deserialize)]
struct SimilarityArtifact {
    titles: Vec<String>,
    matrix: Vec<Vec<f32>>,
}

/// All loaded artifacts, immutable and shared read-only for the process
/// lifetime. Handlers receive this through an explicit context object,
/// never through globals.
pub struct ArtifactStore {
    classifier: ClassifierHandle,
    recommender: RecommenderHandle,
}

impl ArtifactStore {
    /// Load every artifact from `dir`.
    ///
    /// Infallible by policy: a missing or corrupt artifact downgrades its
    /// pipeline to the unavailable sentinel.
    pub fn load<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();

        let classifier = match Self::try_load_classifier(dir) {
            Ok(c) => {
                info!("Loaded career classifier ({} labels)", c.labels().len());
                ClassifierHandle::Loaded(c)
            }
            Err(e) => {
                warn!("Career classifier unavailable: {e}");
                ClassifierHandle::Unavailable
            }
        };

        let recommender = match Self::try_load_recommender(dir) {
            Ok(r) => {
                info!(
                    "Loaded course recommender ({} catalog rows)",
                    r.catalog().courses().len()
                );
                RecommenderHandle::Loaded(r)
            }
            Err(e) => {
                warn!("Course recommender unavailable: {e}");
                RecommenderHandle::Unavailable
            }
        };

        Self {
            classifier,
            recommender,
        }
    }

    /// Assemble a store from already-built handles (embedding, tests).
    #[must_use]
    pub fn from_handles(classifier: ClassifierHandle, recommender: RecommenderHandle) -> Self {
        Self {
            classifier,
            recommender,
        }
    }

    fn try_load_classifier(dir: &Path) -> Result<CareerClassifier> {
        let scaler: FeatureScaler = read_json(&dir.join(SCALER_FILE))?;
        let weights: ClassifierWeights = read_json(&dir.join(CLASSIFIER_FILE))?;
        CareerClassifier::from_artifacts(scaler, weights)
    }

    fn try_load_recommender(dir: &Path) -> Result<Recommender> {
        let similarity: SimilarityArtifact = read_json(&dir.join(SIMILARITY_FILE))?;
        let courses: Vec<Course> = read_json(&dir.join(CATALOG_FILE))?;
        // The popularity table is display-only; missing is an empty table,
        // not a degraded recommender.
        let popular: Vec<PopularCourse> =
            read_json(&dir.join(POPULAR_FILE)).unwrap_or_default();

        let index = CourseIndex::from_titles(similarity.titles)?;
        let matrix = SimilarityMatrix::new(similarity.matrix)?;
        let catalog = CourseCatalog::new(courses)?;
        Recommender::new(index, matrix, catalog, popular)
    }

    #[inline]
    #[must_use]
    pub fn classifier(&self) -> &ClassifierHandle {
        &self.classifier
    }

    #[inline]
    #[must_use]
    pub fn recommender(&self) -> &RecommenderHandle {
        &self.recommender
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| Error::ArtifactUnavailable(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|e| Error::ArtifactUnavailable(format!("{}: {e}", path.display())))
}
