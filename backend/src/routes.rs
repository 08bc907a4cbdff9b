use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use shared::{
    Assessment, AssessmentError, ClassifierError, ErrorResponse, FeatureName, HEALTHY_REFERENCE,
    Measurements, RiskClassifier, assess_measurements,
};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug)]
pub struct AssessmentResponse {
    pub assessment_id: Uuid,
    pub assessed_at: DateTime<Utc>,
    pub model: String,
    #[serde(flatten)]
    pub assessment: Assessment,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ReferenceValue {
    pub metric: FeatureName,
    pub label: String,
    pub value: f64,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(web::resource("/api/assess").route(web::post().to(handle_assessment)))
        .service(web::resource("/api/health").route(web::get().to(health)))
        .service(web::resource("/api/reference").route(web::get().to(reference_profile)));
}

/// Malformed bodies get the same JSON error shape as failed validation.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        warn!("Rejected assessment payload: {}", err);
        let response = HttpResponse::BadRequest().json(ErrorResponse {
            error: err.to_string(),
            kind: "validation_error".into(),
            field: None,
        });
        InternalError::from_response(err, response).into()
    })
}

fn status_for(err: &AssessmentError) -> StatusCode {
    match err {
        AssessmentError::Validation(_) => StatusCode::BAD_REQUEST,
        AssessmentError::Classifier(ClassifierError::ModelUnavailable { .. }) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        AssessmentError::Classifier(ClassifierError::Inference(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

async fn handle_assessment(
    classifier: web::Data<dyn RiskClassifier>,
    body: web::Json<Measurements>,
) -> HttpResponse {
    let assessment_id = Uuid::new_v4();

    match assess_measurements(classifier.get_ref(), body.into_inner()) {
        Ok(assessment) => {
            info!(
                "Assessment {}: {} (p={:.3})",
                assessment_id, assessment.label, assessment.probability
            );
            HttpResponse::Ok().json(AssessmentResponse {
                assessment_id,
                assessed_at: Utc::now(),
                model: classifier.name().to_string(),
                assessment,
            })
        }
        Err(e) => {
            let status = status_for(&e);
            if status.is_server_error() {
                error!("Assessment {} failed: {}", assessment_id, e);
            } else {
                warn!("Assessment {} rejected: {}", assessment_id, e);
            }
            HttpResponse::build(status).json(ErrorResponse {
                error: e.to_string(),
                kind: e.kind().to_string(),
                field: e.field(),
            })
        }
    }
}

async fn health(classifier: web::Data<dyn RiskClassifier>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".into(),
        model: classifier.name().to_string(),
    })
}

async fn reference_profile() -> HttpResponse {
    let profile: Vec<ReferenceValue> = FeatureName::ordered()
        .zip(HEALTHY_REFERENCE)
        .map(|(metric, value)| ReferenceValue {
            metric,
            label: metric.to_string(),
            value,
        })
        .collect();
    HttpResponse::Ok().json(profile)
}
