use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::features::{FEATURE_COUNT, FeatureName, FeatureVector};

/// "Healthy" profile plotted against the user's values, in canonical order.
pub const HEALTHY_REFERENCE: [f64; FEATURE_COUNT] =
    [3.0, 100.0, 70.0, 20.0, 100.0, 22.0, 0.4, 30.0];

const LIFESTYLE_BASELINE: i32 = 100;

/// (field, threshold, penalty). A penalty applies when the value is strictly above the threshold.
const LIFESTYLE_PENALTIES: [(FeatureName, f64, i32); 6] = [
    (FeatureName::Glucose, 140.0, 15),
    (FeatureName::Insulin, 200.0, 10),
    (FeatureName::Bmi, 30.0, 15),
    (FeatureName::BloodPressure, 130.0, 10),
    (FeatureName::DiabetesPedigreeFunction, 0.8, 10),
    (FeatureName::Age, 50.0, 10),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Half-open bands: `[0, 18.5)`, `[18.5, 25)`, `[25, 30)`, `[30, inf)`.
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LifestyleRating {
    Excellent,
    Good,
    Moderate,
    NeedsImprovement,
}

impl LifestyleRating {
    pub fn from_score(score: i32) -> Self {
        if score > 85 {
            LifestyleRating::Excellent
        } else if score > 70 {
            LifestyleRating::Good
        } else if score > 50 {
            LifestyleRating::Moderate
        } else {
            LifestyleRating::NeedsImprovement
        }
    }
}

/// Band of the probability gauge: `[0, 0.3)`, `[0.3, 0.7)`, `[0.7, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RiskBand {
    Low,
    Moderate,
    High,
}

impl RiskBand {
    pub const ALERT_PROBABILITY: f64 = 0.7;

    pub fn from_probability(probability: f64) -> Self {
        if probability < 0.3 {
            RiskBand::Low
        } else if probability < Self::ALERT_PROBABILITY {
            RiskBand::Moderate
        } else {
            RiskBand::High
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarPoint {
    pub metric: FeatureName,
    pub value: f64,
    pub reference: f64,
}

impl RadarPoint {
    pub fn pair(&self) -> (f64, f64) {
        (self.value, self.reference)
    }
}

/// Whether a measurement sits inside its screening guideline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCheck {
    pub metric: FeatureName,
    pub value: f64,
    /// Inclusive lower bound, if any.
    pub min: Option<f64>,
    /// Exclusive upper bound.
    pub max: f64,
    pub within: bool,
}

impl ReferenceCheck {
    fn new(metric: FeatureName, value: f64, min: Option<f64>, max: f64) -> Self {
        let within = min.is_none_or(|lo| value >= lo) && value < max;
        Self {
            metric,
            value,
            min,
            max,
            within,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub bmi_category: BmiCategory,
    pub lifestyle_score: i32,
    pub lifestyle_rating: LifestyleRating,
    pub radar_comparison: Vec<RadarPoint>,
    pub reference_checks: Vec<ReferenceCheck>,
}

impl DerivedMetrics {
    pub fn compute(features: &FeatureVector) -> Self {
        let lifestyle_score = lifestyle_score(features);
        Self {
            bmi_category: BmiCategory::from_bmi(features.bmi()),
            lifestyle_score,
            lifestyle_rating: LifestyleRating::from_score(lifestyle_score),
            radar_comparison: radar_comparison(features),
            reference_checks: reference_checks(features),
        }
    }
}

/// Starts at 100 and subtracts each penalty whose threshold is exceeded.
/// Not clamped; with the current penalties the minimum is 30.
pub fn lifestyle_score(features: &FeatureVector) -> i32 {
    LIFESTYLE_PENALTIES
        .iter()
        .filter(|(field, threshold, _)| features.get(*field) > *threshold)
        .fold(LIFESTYLE_BASELINE, |score, (_, _, penalty)| score - penalty)
}

pub fn radar_comparison(features: &FeatureVector) -> Vec<RadarPoint> {
    FeatureName::ordered()
        .zip(features.values())
        .zip(HEALTHY_REFERENCE)
        .map(|((metric, value), reference)| RadarPoint {
            metric,
            value,
            reference,
        })
        .collect()
}

/// Guidelines for the key metrics: glucose, diastolic pressure, BMI and fasting insulin.
pub fn reference_checks(features: &FeatureVector) -> Vec<ReferenceCheck> {
    vec![
        ReferenceCheck::new(FeatureName::Glucose, features.glucose(), None, 100.0),
        ReferenceCheck::new(
            FeatureName::BloodPressure,
            features.blood_pressure(),
            None,
            80.0,
        ),
        ReferenceCheck::new(FeatureName::Bmi, features.bmi(), Some(18.5), 25.0),
        ReferenceCheck::new(FeatureName::Insulin, features.insulin(), None, 25.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Measurements;

    fn vector(values: [f64; FEATURE_COUNT]) -> FeatureVector {
        FeatureVector::assemble(Measurements::from(values)).unwrap()
    }

    #[test]
    fn bmi_boundaries() {
        assert_eq!(BmiCategory::from_bmi(0.0), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.4999), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(24.999), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(29.95), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::Obese);
    }

    #[test]
    fn minimum_vector_scores_full_marks() {
        let metrics = DerivedMetrics::compute(&vector([0.0; FEATURE_COUNT]));
        assert_eq!(metrics.bmi_category, BmiCategory::Underweight);
        assert_eq!(metrics.lifestyle_score, 100);
        assert_eq!(metrics.lifestyle_rating, LifestyleRating::Excellent);
    }

    #[test]
    fn penalties_are_additive() {
        let features = vector([2.0, 150.0, 140.0, 20.0, 250.0, 32.0, 0.9, 60.0]);
        assert_eq!(lifestyle_score(&features), 30);
    }

    #[test]
    fn thresholds_are_strict() {
        let features = vector([0.0, 140.0, 130.0, 0.0, 200.0, 30.0, 0.8, 50.0]);
        assert_eq!(lifestyle_score(&features), 100);

        let features = vector([0.0, 141.0, 0.0, 0.0, 0.0, 22.0, 0.0, 51.0]);
        assert_eq!(lifestyle_score(&features), 75);
    }

    #[test]
    fn rating_boundaries() {
        assert_eq!(LifestyleRating::from_score(86), LifestyleRating::Excellent);
        assert_eq!(LifestyleRating::from_score(85), LifestyleRating::Good);
        assert_eq!(LifestyleRating::from_score(71), LifestyleRating::Good);
        assert_eq!(LifestyleRating::from_score(70), LifestyleRating::Moderate);
        assert_eq!(LifestyleRating::from_score(51), LifestyleRating::Moderate);
        assert_eq!(
            LifestyleRating::from_score(50),
            LifestyleRating::NeedsImprovement
        );
    }

    #[test]
    fn risk_bands() {
        assert_eq!(RiskBand::from_probability(0.0), RiskBand::Low);
        assert_eq!(RiskBand::from_probability(0.299), RiskBand::Low);
        assert_eq!(RiskBand::from_probability(0.3), RiskBand::Moderate);
        assert_eq!(RiskBand::from_probability(0.699), RiskBand::Moderate);
        assert_eq!(RiskBand::from_probability(0.7), RiskBand::High);
        assert_eq!(RiskBand::from_probability(1.0), RiskBand::High);
    }

    #[test]
    fn radar_pairs_follow_canonical_order() {
        let features = vector([1.0, 90.0, 70.0, 20.0, 80.0, 22.0, 0.4, 30.0]);
        let points = radar_comparison(&features);
        assert_eq!(points.len(), FEATURE_COUNT);
        assert_eq!(points[0].metric, FeatureName::Pregnancies);
        assert_eq!(points[7].metric, FeatureName::Age);
        let pairs: Vec<(f64, f64)> = points.iter().map(RadarPoint::pair).collect();
        assert_eq!(
            pairs,
            vec![
                (1.0, 3.0),
                (90.0, 100.0),
                (70.0, 70.0),
                (20.0, 20.0),
                (80.0, 100.0),
                (22.0, 22.0),
                (0.4, 0.4),
                (30.0, 30.0)
            ]
        );
    }

    #[test]
    fn reference_checks_flag_out_of_range_values() {
        let features = vector([0.0, 120.0, 70.0, 20.0, 20.0, 17.0, 0.2, 40.0]);
        let checks = reference_checks(&features);
        let within: Vec<(FeatureName, bool)> =
            checks.iter().map(|c| (c.metric, c.within)).collect();
        assert_eq!(
            within,
            vec![
                (FeatureName::Glucose, false),
                (FeatureName::BloodPressure, true),
                (FeatureName::Bmi, false),
                (FeatureName::Insulin, true),
            ]
        );
    }
}
