use actix_web::{delete, get, post, web, HttpRequest, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{ListResponsesParams, SubmitResponseRequest},
};

#[post("/api/forms/{form_id}/responses")]
async fn submit_response(
    state: web::Data<AppState>,
    form_id: web::Path<String>,
    request: web::Json<SubmitResponseRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    // Injected server-side from the connection, never taken from the
    // payload.
    let client_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(String::from);

    let result = state
        .response_ingest_service
        .submit(&form_id, request.into_inner(), client_ip.as_deref())
        .await?;

    Ok(HttpResponse::Created().json(result))
}

#[get("/api/forms/{form_id}/responses")]
async fn list_responses(
    state: web::Data<AppState>,
    form_id: web::Path<String>,
    params: web::Query<ListResponsesParams>,
) -> Result<HttpResponse, AppError> {
    let page = state
        .response_read_service
        .list(&form_id, &params, None)
        .await?;

    Ok(HttpResponse::Ok().json(page))
}

#[get("/api/responses/{response_id}")]
async fn get_response(
    state: web::Data<AppState>,
    response_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = state.response_read_service.get(&response_id, None).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[delete("/api/responses/{response_id}")]
async fn delete_response(
    state: web::Data<AppState>,
    response_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.response_ingest_service.delete(&response_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/api/forms/{form_id}/responses/export")]
async fn export_responses(
    state: web::Data<AppState>,
    form_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let export = state.csv_export_service.export(&form_id, None).await?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", export.filename),
        ))
        .body(export.bytes))
}
