pub mod csv_export_service;
pub mod form_service;
pub mod identity_matcher;
pub mod response_ingest_service;
pub mod response_read_service;
pub mod scoring_engine;

pub use csv_export_service::{CsvExport, CsvExportService};
pub use form_service::FormService;
pub use identity_matcher::IdentityMatcher;
pub use response_ingest_service::ResponseIngestService;
pub use response_read_service::ResponseReadService;
pub use scoring_engine::{ScoringEngine, ScoringOutcome};
