use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    crypto::FieldCodec,
    errors::{AppError, AppResult},
    models::domain::{Form, FormField, FormResponse},
    repositories::{ExportCursor, FormRepository, ResponseRepository},
    services::form_service::ensure_form_visible,
};

/// UTF-8 byte-order mark so spreadsheet tools auto-detect encoding.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

#[derive(Debug, Clone)]
pub struct CsvExport {
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// Memory-bounded bulk export of all responses for a form. Rows are
/// fetched in fixed-size batches via a `(submitted_at, id)` keyset
/// cursor, so per-batch cost stays constant regardless of how many
/// responses precede it and concurrent inserts never cause a row to be
/// skipped or duplicated within one run.
pub struct CsvExportService {
    forms: Arc<dyn FormRepository>,
    responses: Arc<dyn ResponseRepository>,
    codec: Arc<FieldCodec>,
    batch_size: usize,
}

impl CsvExportService {
    pub fn new(
        forms: Arc<dyn FormRepository>,
        responses: Arc<dyn ResponseRepository>,
        codec: Arc<FieldCodec>,
        batch_size: usize,
    ) -> Self {
        Self {
            forms,
            responses,
            codec,
            batch_size: batch_size.max(1),
        }
    }

    pub async fn export(
        &self,
        form_id: &str,
        caller_user_id: Option<&str>,
    ) -> AppResult<CsvExport> {
        let form = self
            .forms
            .find_by_id(form_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Form with id '{}' not found", form_id)))?;

        ensure_form_visible(&form, caller_user_id)?;

        let fields: Vec<&FormField> = form.answerable_fields().collect();

        let mut document = String::new();
        document.push_str(&header_row(&form, &fields));

        let mut cursor: Option<ExportCursor> = None;
        let mut row_count = 0usize;

        loop {
            let batch = self
                .responses
                .find_batch_after(&form.id, cursor.as_ref(), self.batch_size)
                .await?;

            if batch.is_empty() {
                break;
            }

            for response in &batch {
                document.push('\n');
                document.push_str(&self.render_row(&form, &fields, response));
            }
            row_count += batch.len();

            if let Some(last) = batch.last() {
                cursor = Some(ExportCursor::from_response(last));
            }

            // A short batch can only occur at the end of the table
            // (assuming no concurrent deletion shrinks earlier batches).
            if batch.len() < self.batch_size {
                break;
            }
        }

        log::info!(
            "exported {} responses for form '{}' in batches of {}",
            row_count,
            form.id,
            self.batch_size
        );

        let mut bytes = Vec::with_capacity(UTF8_BOM.len() + document.len());
        bytes.extend_from_slice(UTF8_BOM);
        bytes.extend_from_slice(document.as_bytes());

        Ok(CsvExport {
            bytes,
            filename: export_filename(&form.title),
        })
    }

    fn render_row(&self, form: &Form, fields: &[&FormField], response: &FormResponse) -> String {
        let mut cells = Vec::with_capacity(fields.len() + 5);

        cells.push(
            response
                .submitted_at
                .format("%d/%m/%Y, %H:%M:%S")
                .to_string(),
        );

        if form.settings.collect_email {
            cells.push(response.respondent_email.clone().unwrap_or_default());
        }

        for field in fields {
            let value = match response.answer_for(&field.id) {
                Some(answer) if field.is_pii => self.codec.decrypt_or_sentinel(&answer.value),
                Some(answer) => answer.value.clone(),
                None => String::new(),
            };
            cells.push(value);
        }

        if form.is_quiz {
            cells.push(
                response
                    .score
                    .map(|s| s.to_string())
                    .unwrap_or_default(),
            );
            cells.push(
                response
                    .total_score
                    .map(|t| t.to_string())
                    .unwrap_or_default(),
            );
            let percentage = match (response.score, response.total_score) {
                (Some(score), Some(total)) if total > 0 => {
                    format!("{:.2}", f64::from(score) / f64::from(total) * 100.0)
                }
                _ => String::new(),
            };
            cells.push(percentage);
        }

        cells
            .iter()
            .map(|cell| csv_escape(cell))
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn header_row(form: &Form, fields: &[&FormField]) -> String {
    let mut columns = Vec::with_capacity(fields.len() + 5);
    columns.push("Submitted At".to_string());
    if form.settings.collect_email {
        columns.push("Respondent Email".to_string());
    }
    for field in fields {
        columns.push(strip_html(&field.label));
    }
    if form.is_quiz {
        columns.push("Score".to_string());
        columns.push("Total Score".to_string());
        columns.push("Percentage".to_string());
    }

    columns
        .iter()
        .map(|column| csv_escape(column))
        .collect::<Vec<_>>()
        .join(",")
}

/// Quote a value iff it contains a comma, quote, or newline; internal
/// quotes are doubled.
fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn strip_html(label: &str) -> String {
    HTML_TAG.replace_all(label, "").to_string()
}

/// `{form-title-slug}_responses_{YYYY-MM-DD}.csv`; the slug keeps only
/// alphanumerics, lower-cased.
fn export_filename(title: &str) -> String {
    let slug: String = title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();

    format!("{}_responses_{}.csv", slug, Utc::now().format("%Y-%m-%d"))
}
