use approx::assert_abs_diff_eq;
use shared::{
    AssessmentError, BmiCategory, ClassifierError, FeatureName, FeatureVector, FixedClassifier,
    LifestyleRating, Measurements, RiskBand, RiskClassifier, RiskLabel, assess,
    assess_measurements,
};

struct FailingClassifier;

impl RiskClassifier for FailingClassifier {
    fn name(&self) -> &str {
        "failing"
    }

    fn predict_probability(&self, _features: &FeatureVector) -> Result<f64, ClassifierError> {
        Err(ClassifierError::Inference("expected 9 features, got 8".into()))
    }
}

fn healthy_input() -> Measurements {
    Measurements::from([1.0, 90.0, 70.0, 20.0, 80.0, 22.0, 0.4, 30.0])
}

#[test]
fn end_to_end_low_risk() {
    let stub = FixedClassifier::with_label(RiskLabel::LowRisk, 0.12);
    let assessment = assess_measurements(&stub, healthy_input()).unwrap();

    assert_eq!(assessment.label, RiskLabel::LowRisk);
    assert_eq!(assessment.probability, 0.12);
    assert_abs_diff_eq!(assessment.probability_percent, 12.0, epsilon = 1e-9);
    assert_eq!(assessment.risk_band, RiskBand::Low);
    assert_eq!(assessment.bmi_category, BmiCategory::Normal);
    assert_eq!(assessment.lifestyle_score, 100);
    assert_eq!(assessment.lifestyle_rating, LifestyleRating::Excellent);

    let pairs: Vec<(f64, f64)> = assessment
        .radar_comparison
        .iter()
        .map(|p| p.pair())
        .collect();
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
fn high_risk_profile() {
    let input = Measurements::from([4.0, 150.0, 140.0, 35.0, 250.0, 32.0, 0.9, 60.0]);
    let stub = FixedClassifier::new(0.83);
    let assessment = assess_measurements(&stub, input).unwrap();

    assert_eq!(assessment.label, RiskLabel::HighRisk);
    assert_eq!(assessment.risk_band, RiskBand::High);
    assert_eq!(assessment.bmi_category, BmiCategory::Obese);
    assert_eq!(assessment.lifestyle_score, 30);
    assert_eq!(assessment.lifestyle_rating, LifestyleRating::NeedsImprovement);
}

#[test]
fn risk_band_follows_reported_probability() {
    for (probability, band) in [
        (0.29, RiskBand::Low),
        (0.3, RiskBand::Moderate),
        (0.69, RiskBand::Moderate),
        (0.7, RiskBand::High),
    ] {
        let assessment = assess_measurements(&FixedClassifier::new(probability), healthy_input())
            .unwrap();
        assert_eq!(assessment.risk_band, band, "probability {probability}");
    }
}

#[test]
fn derived_metrics_are_idempotent() {
    let stub = FixedClassifier::new(0.4);
    let features = FeatureVector::assemble(healthy_input()).unwrap();
    let first = assess(&stub, &features).unwrap();
    let second = assess(&stub, &features).unwrap();
    assert_eq!(first, second);
}

#[test]
fn validation_errors_name_the_field() {
    let stub = FixedClassifier::new(0.1);
    for (field, value) in [
        (FeatureName::Age, -3.0),
        (FeatureName::Glucose, -1.0),
        (FeatureName::DiabetesPedigreeFunction, 2.6),
    ] {
        let mut values = [1.0, 90.0, 70.0, 20.0, 80.0, 22.0, 0.4, 30.0];
        values[field.index()] = value;
        let err = assess_measurements(&stub, Measurements::from(values)).unwrap_err();
        assert_eq!(err.kind(), "validation_error");
        assert_eq!(err.field(), Some(field));
    }
}

#[test]
fn inference_failure_is_surfaced() {
    let err = assess_measurements(&FailingClassifier, healthy_input()).unwrap_err();
    assert!(matches!(
        err,
        AssessmentError::Classifier(ClassifierError::Inference(_))
    ));
    assert_eq!(err.kind(), "inference_error");
    assert_eq!(err.field(), None);
}

#[test]
fn assessment_wire_format() {
    let stub = FixedClassifier::with_label(RiskLabel::LowRisk, 0.12);
    let assessment = assess_measurements(&stub, healthy_input()).unwrap();
    let json = serde_json::to_value(&assessment).unwrap();

    assert_eq!(json["label"], "low_risk");
    assert_eq!(json["bmi_category"], "normal");
    assert_eq!(json["lifestyle_score"], 100);
    assert_eq!(json["radar_comparison"][6]["metric"], "diabetes_pedigree_function");
    assert_eq!(json["radar_comparison"][6]["reference"], 0.4);
}

#[test]
fn measurements_deserialize_from_named_fields() {
    let body = r#"{
        "pregnancies": 2, "glucose": 120, "blood_pressure": 72, "skin_thickness": 25,
        "insulin": 90, "bmi": 27.5, "diabetes_pedigree_function": 0.35, "age": 41
    }"#;
    let input: Measurements = serde_json::from_str(body).unwrap();
    let features = FeatureVector::assemble(input).unwrap();
    assert_eq!(features.pregnancies(), 2);
    assert_eq!(features.age(), 41);
    assert_eq!(features.bmi(), 27.5);
}
