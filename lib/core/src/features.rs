//! Student feature vector
//!
//! Fixed-order numeric input to the career classifier. Field order and
//! arity must match the schema the model was trained on.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of fields the classifier was trained on.
pub const FEATURE_COUNT: usize = 14;

/// Features for one student record.
///
/// Layout: [gender, part_time_job, absence_days, extracurricular,
/// self_study_hours, seven subject scores, total, average]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudentFeatures {
    /// 0 = male, 1 = female.
    pub gender: f32,
    /// 0/1 flag.
    pub part_time_job: f32,
    pub absence_days: f32,
    /// 0/1 flag.
    pub extracurricular_activities: f32,
    pub weekly_self_study_hours: f32,

    pub math_score: f32,
    pub history_score: f32,
    pub physics_score: f32,
    pub chemistry_score: f32,
    pub biology_score: f32,
    pub english_score: f32,
    pub geography_score: f32,

    pub total_score: f32,
    pub average_score: f32,
}

impl StudentFeatures {
    /// Convert to the fixed-order vector the model expects.
    #[must_use]
    pub fn to_vector(&self) -> Vec<f32> {
        vec![
            self.gender,
            self.part_time_job,
            self.absence_days,
            self.extracurricular_activities,
            self.weekly_self_study_hours,
            self.math_score,
            self.history_score,
            self.physics_score,
            self.chemistry_score,
            self.biology_score,
            self.english_score,
            self.geography_score,
            self.total_score,
            self.average_score,
        ]
    }

    /// Build from a raw slice in documented order.
    ///
    /// Rejects wrong arity and non-finite values; both are caller input
    /// errors, not artifact failures.
    pub fn from_slice(values: &[f32]) -> Result<Self> {
        if values.len() != FEATURE_COUNT {
            return Err(Error::InvalidFeatureCount {
                expected: FEATURE_COUNT,
                actual: values.len(),
            });
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "non-finite feature value: {bad}"
            )));
        }

        Ok(Self {
            gender: values[0],
            part_time_job: values[1],
            absence_days: values[2],
            extracurricular_activities: values[3],
            weekly_self_study_hours: values[4],
            math_score: values[5],
            history_score: values[6],
            physics_score: values[7],
            chemistry_score: values[8],
            biology_score: values[9],
            english_score: values[10],
            geography_score: values[11],
            total_score: values[12],
            average_score: values[13],
        })
    }
}
