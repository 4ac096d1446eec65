use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use formflow_server::{app_state::AppState, config::Config, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    if std::env::var("APP_ENV").as_deref() == Ok("production") {
        config.validate_for_production();
    }

    let host = config.web_server_host.clone();
    let port = config.web_server_port;

    let state = match AppState::new(config).await {
        Ok(state) => state,
        Err(err) => {
            log::error!("failed to initialize application: {}", err);
            std::process::exit(1);
        }
    };

    log::info!("Starting server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .service(handlers::health_check)
            .service(handlers::get_form)
            .service(handlers::submit_response)
            .service(handlers::list_responses)
            .service(handlers::get_response)
            .service(handlers::delete_response)
            .service(handlers::export_responses)
    })
    .bind((host, port))?
    .run()
    .await
}
