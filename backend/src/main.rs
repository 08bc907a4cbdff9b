use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use glucotrack_backend::config::AppConfig;
use glucotrack_backend::model::load_classifier;
use glucotrack_backend::routes::configure_routes;
use std::env;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    } else {
        log::error!("Failed to get the current working directory.");
    }

    let (config, source) = AppConfig::load().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;
    log::info!("Configuration loaded from {}", source);

    let classifier = match load_classifier(&config.model) {
        Ok(classifier) => classifier,
        Err(e) => {
            log::error!("Failed to load model at startup: {}", e);
            return Err(std::io::Error::other(format!("Model loading failed: {}", e)));
        }
    };
    let classifier = web::Data::from(classifier);

    let bind_address = config.bind_address();
    let cors_max_age = config.server.cors_max_age;

    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(cors_max_age),
            )
            .app_data(classifier.clone())
            .configure(configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}
