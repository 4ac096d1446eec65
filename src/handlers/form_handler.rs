use actix_web::{get, web, HttpResponse};

use crate::{app_state::AppState, errors::AppError, models::dto::response::FormView};

#[get("/api/forms/{form_id}")]
async fn get_form(
    state: web::Data<AppState>,
    form_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let form = state.form_service.get_form(&form_id, None).await?;
    Ok(HttpResponse::Ok().json(FormView::from(&form)))
}

#[get("/health")]
async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    state.db.health_check().await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })))
}
