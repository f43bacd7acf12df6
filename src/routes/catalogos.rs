use axum::{extract::State, response::IntoResponse, Json};

use crate::{error::Result, AppState};

#[utoipa::path(
    get,
    path = "/api/catalogos/areas-sectores",
    responses(
        (status = 200, description = "Areas and sectors for selection lists")
    )
)]
#[axum::debug_handler]
pub async fn areas_sectores(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(state.catalog_service.areas_sectores().await?))
}

#[utoipa::path(
    get,
    path = "/api/catalogos/criterios",
    responses(
        (status = 200, description = "Evaluation criteria")
    )
)]
#[axum::debug_handler]
pub async fn criterios(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(state.catalog_service.criterios().await?))
}

#[utoipa::path(
    get,
    path = "/api/catalogos/tipos-archivo",
    responses(
        (status = 200, description = "Document types")
    )
)]
#[axum::debug_handler]
pub async fn tipos_archivo(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(state.catalog_service.tipos_archivo().await?))
}

#[utoipa::path(
    get,
    path = "/api/catalogos/tipos-publicacion",
    responses(
        (status = 200, description = "Publication types")
    )
)]
#[axum::debug_handler]
pub async fn tipos_publicacion(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(state.catalog_service.tipos_publicacion().await?))
}

#[utoipa::path(
    get,
    path = "/api/catalogos/profesiones",
    responses(
        (status = 200, description = "Professions")
    )
)]
#[axum::debug_handler]
pub async fn profesiones(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(state.catalog_service.profesiones().await?))
}

#[utoipa::path(
    get,
    path = "/api/catalogos/paises",
    responses(
        (status = 200, description = "Countries")
    )
)]
#[axum::debug_handler]
pub async fn paises(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(state.catalog_service.paises().await?))
}
