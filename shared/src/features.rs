use serde::{Deserialize, Serialize};
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{Display, EnumCount as EnumCountMacro, EnumIter};

/// Number of fields in a [`FeatureVector`].
pub const FEATURE_COUNT: usize = FeatureName::COUNT;

/// Upper bound accepted for the diabetes pedigree function.
pub const MAX_PEDIGREE_FUNCTION: f64 = 2.5;

/// The eight measurements in the order the classifier expects them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumCountMacro,
)]
#[serde(rename_all = "snake_case")]
pub enum FeatureName {
    #[strum(to_string = "Pregnancies")]
    Pregnancies,
    #[strum(to_string = "Glucose")]
    Glucose,
    #[strum(to_string = "Blood Pressure")]
    BloodPressure,
    #[strum(to_string = "Skin Thickness")]
    SkinThickness,
    #[strum(to_string = "Insulin")]
    Insulin,
    #[strum(to_string = "BMI")]
    Bmi,
    #[strum(to_string = "DPF")]
    DiabetesPedigreeFunction,
    #[strum(to_string = "Age")]
    Age,
}

impl FeatureName {
    /// All names in canonical order.
    pub fn ordered() -> impl Iterator<Item = FeatureName> {
        FeatureName::iter()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Column header used by the training dataset and by exported model artifacts.
    pub fn column_name(self) -> &'static str {
        match self {
            FeatureName::Pregnancies => "Pregnancies",
            FeatureName::Glucose => "Glucose",
            FeatureName::BloodPressure => "BloodPressure",
            FeatureName::SkinThickness => "SkinThickness",
            FeatureName::Insulin => "Insulin",
            FeatureName::Bmi => "BMI",
            FeatureName::DiabetesPedigreeFunction => "DiabetesPedigreeFunction",
            FeatureName::Age => "Age",
        }
    }

    /// Snake-case key used on the wire.
    pub fn key(self) -> &'static str {
        match self {
            FeatureName::Pregnancies => "pregnancies",
            FeatureName::Glucose => "glucose",
            FeatureName::BloodPressure => "blood_pressure",
            FeatureName::SkinThickness => "skin_thickness",
            FeatureName::Insulin => "insulin",
            FeatureName::Bmi => "bmi",
            FeatureName::DiabetesPedigreeFunction => "diabetes_pedigree_function",
            FeatureName::Age => "age",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{} must be a finite number", .field.key())]
    NotFinite { field: FeatureName },
    #[error("{} must be non-negative, got {value}", .field.key())]
    Negative { field: FeatureName, value: f64 },
    #[error("{} must be a whole number, got {value}", .field.key())]
    NotWholeNumber { field: FeatureName, value: f64 },
    #[error("{} must be within [{min}, {max}], got {value}", .field.key())]
    OutOfRange {
        field: FeatureName,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl ValidationError {
    pub fn field(&self) -> FeatureName {
        match self {
            ValidationError::NotFinite { field }
            | ValidationError::Negative { field, .. }
            | ValidationError::NotWholeNumber { field, .. }
            | ValidationError::OutOfRange { field, .. } => *field,
        }
    }
}

/// Raw, unvalidated measurements as submitted by a client.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Measurements {
    pub pregnancies: f64,
    pub glucose: f64,
    pub blood_pressure: f64,
    pub skin_thickness: f64,
    pub insulin: f64,
    pub bmi: f64,
    pub diabetes_pedigree_function: f64,
    pub age: f64,
}

impl Measurements {
    pub fn get(&self, name: FeatureName) -> f64 {
        match name {
            FeatureName::Pregnancies => self.pregnancies,
            FeatureName::Glucose => self.glucose,
            FeatureName::BloodPressure => self.blood_pressure,
            FeatureName::SkinThickness => self.skin_thickness,
            FeatureName::Insulin => self.insulin,
            FeatureName::Bmi => self.bmi,
            FeatureName::DiabetesPedigreeFunction => self.diabetes_pedigree_function,
            FeatureName::Age => self.age,
        }
    }
}

impl From<[f64; FEATURE_COUNT]> for Measurements {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        let [
            pregnancies,
            glucose,
            blood_pressure,
            skin_thickness,
            insulin,
            bmi,
            diabetes_pedigree_function,
            age,
        ] = values;
        Self {
            pregnancies,
            glucose,
            blood_pressure,
            skin_thickness,
            insulin,
            bmi,
            diabetes_pedigree_function,
            age,
        }
    }
}

/// A validated, fixed-order feature vector for a single assessment.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pregnancies: u32,
    glucose: f64,
    blood_pressure: f64,
    skin_thickness: f64,
    insulin: f64,
    bmi: f64,
    diabetes_pedigree_function: f64,
    age: u32,
}

impl FeatureVector {
    /// Validates every field in canonical order and reports the first violation.
    pub fn assemble(input: Measurements) -> Result<Self, ValidationError> {
        for name in FeatureName::ordered() {
            check(name, input.get(name))?;
        }

        Ok(Self {
            pregnancies: input.pregnancies as u32,
            glucose: input.glucose,
            blood_pressure: input.blood_pressure,
            skin_thickness: input.skin_thickness,
            insulin: input.insulin,
            bmi: input.bmi,
            diabetes_pedigree_function: input.diabetes_pedigree_function,
            age: input.age as u32,
        })
    }

    pub fn pregnancies(&self) -> u32 {
        self.pregnancies
    }

    pub fn glucose(&self) -> f64 {
        self.glucose
    }

    pub fn blood_pressure(&self) -> f64 {
        self.blood_pressure
    }

    pub fn skin_thickness(&self) -> f64 {
        self.skin_thickness
    }

    pub fn insulin(&self) -> f64 {
        self.insulin
    }

    pub fn bmi(&self) -> f64 {
        self.bmi
    }

    pub fn diabetes_pedigree_function(&self) -> f64 {
        self.diabetes_pedigree_function
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn get(&self, name: FeatureName) -> f64 {
        self.values()[name.index()]
    }

    /// Values in canonical order.
    pub fn values(&self) -> [f64; FEATURE_COUNT] {
        [
            f64::from(self.pregnancies),
            self.glucose,
            self.blood_pressure,
            self.skin_thickness,
            self.insulin,
            self.bmi,
            self.diabetes_pedigree_function,
            f64::from(self.age),
        ]
    }
}

impl TryFrom<Measurements> for FeatureVector {
    type Error = ValidationError;

    fn try_from(input: Measurements) -> Result<Self, Self::Error> {
        FeatureVector::assemble(input)
    }
}

fn check(field: FeatureName, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative { field, value });
    }

    match field {
        FeatureName::Pregnancies | FeatureName::Age => {
            if value.fract() != 0.0 {
                return Err(ValidationError::NotWholeNumber { field, value });
            }
            if value > f64::from(u32::MAX) {
                return Err(ValidationError::OutOfRange {
                    field,
                    value,
                    min: 0.0,
                    max: f64::from(u32::MAX),
                });
            }
        }
        FeatureName::DiabetesPedigreeFunction if value > MAX_PEDIGREE_FUNCTION => {
            return Err(ValidationError::OutOfRange {
                field,
                value,
                min: 0.0,
                max: MAX_PEDIGREE_FUNCTION,
            });
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline() -> Measurements {
        Measurements::from([1.0, 90.0, 70.0, 20.0, 80.0, 22.0, 0.4, 30.0])
    }

    #[test]
    fn assembles_in_canonical_order() {
        let vector = FeatureVector::assemble(baseline()).unwrap();
        assert_eq!(vector.values(), [1.0, 90.0, 70.0, 20.0, 80.0, 22.0, 0.4, 30.0]);
        assert_eq!(vector.age(), 30);
        assert_eq!(vector.get(FeatureName::Bmi), 22.0);
    }

    #[test]
    fn rejects_negative_age() {
        let mut input = baseline();
        input.age = -1.0;
        let err = FeatureVector::assemble(input).unwrap_err();
        assert_eq!(err.field(), FeatureName::Age);
        assert!(matches!(err, ValidationError::Negative { .. }));
    }

    #[test]
    fn rejects_negative_glucose() {
        let mut input = baseline();
        input.glucose = -0.5;
        let err = FeatureVector::assemble(input).unwrap_err();
        assert_eq!(err.field(), FeatureName::Glucose);
    }

    #[test]
    fn rejects_pedigree_above_bound() {
        let mut input = baseline();
        input.diabetes_pedigree_function = 2.51;
        let err = FeatureVector::assemble(input).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OutOfRange {
                field: FeatureName::DiabetesPedigreeFunction,
                ..
            }
        ));

        let mut input = baseline();
        input.diabetes_pedigree_function = 2.5;
        assert!(FeatureVector::assemble(input).is_ok());
    }

    #[test]
    fn rejects_fractional_counts() {
        let mut input = baseline();
        input.pregnancies = 1.5;
        let err = FeatureVector::assemble(input).unwrap_err();
        assert!(matches!(err, ValidationError::NotWholeNumber { .. }));
    }

    #[test]
    fn rejects_nan() {
        let mut input = baseline();
        input.bmi = f64::NAN;
        let err = FeatureVector::assemble(input).unwrap_err();
        assert_eq!(err, ValidationError::NotFinite { field: FeatureName::Bmi });
    }

    #[test]
    fn reports_first_violation() {
        let mut input = baseline();
        input.glucose = -1.0;
        input.age = -1.0;
        let err = FeatureVector::assemble(input).unwrap_err();
        assert_eq!(err.field(), FeatureName::Glucose);
        assert_eq!(err.to_string(), "glucose must be non-negative, got -1");
    }

    #[test]
    fn labels_and_columns() {
        let labels: Vec<String> = FeatureName::ordered().map(|n| n.to_string()).collect();
        assert_eq!(
            labels,
            [
                "Pregnancies",
                "Glucose",
                "Blood Pressure",
                "Skin Thickness",
                "Insulin",
                "BMI",
                "DPF",
                "Age"
            ]
        );
        assert_eq!(FEATURE_COUNT, 8);
        assert_eq!(
            FeatureName::DiabetesPedigreeFunction.column_name(),
            "DiabetesPedigreeFunction"
        );
    }
}
