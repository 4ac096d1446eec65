use std::sync::Arc;

use crate::{
    config::Config,
    crypto::FieldCodec,
    db::Database,
    errors::AppResult,
    repositories::{
        FormRepository, MongoFormRepository, MongoQuizScoreRepository, MongoResponseRepository,
        QuizScoreRepository, ResponseRepository,
    },
    services::{CsvExportService, FormService, ResponseIngestService, ResponseReadService},
};

#[derive(Clone)]
pub struct AppState {
    pub form_service: Arc<FormService>,
    pub response_ingest_service: Arc<ResponseIngestService>,
    pub response_read_service: Arc<ResponseReadService>,
    pub csv_export_service: Arc<CsvExportService>,
    pub db: Database,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        // Key material is loaded exactly once; a missing or malformed
        // key aborts startup.
        let codec = Arc::new(FieldCodec::from_config(&config)?);

        let form_repository = Arc::new(MongoFormRepository::new(&db));
        form_repository.ensure_indexes().await?;
        let forms: Arc<dyn FormRepository> = form_repository;

        let response_repository = Arc::new(MongoResponseRepository::new(&db));
        response_repository.ensure_indexes().await?;
        let responses: Arc<dyn ResponseRepository> = response_repository;

        let quiz_score_repository = Arc::new(MongoQuizScoreRepository::new(&db));
        quiz_score_repository.ensure_indexes().await?;
        let quiz_scores: Arc<dyn QuizScoreRepository> = quiz_score_repository;

        let form_service = Arc::new(FormService::new(forms.clone()));
        let response_ingest_service = Arc::new(ResponseIngestService::new(
            forms.clone(),
            responses.clone(),
            quiz_scores,
            codec.clone(),
        ));
        let response_read_service = Arc::new(ResponseReadService::new(
            forms.clone(),
            responses.clone(),
            codec.clone(),
        ));
        let csv_export_service = Arc::new(CsvExportService::new(
            forms,
            responses,
            codec,
            config.export_batch_size,
        ));

        Ok(Self {
            form_service,
            response_ingest_service,
            response_read_service,
            csv_export_service,
            db,
            config: Arc::new(config),
        })
    }
}
