use axum::{
    extract::{Multipart, Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use validator::Validate;

use crate::{
    dto::docente_dto::{DocenteListQuery, DocentePatch, DocentePerfil, UpdateEstadoPayload},
    dto::upload::MultipartForm,
    error::{Error, Result},
    middleware::auth::Session,
    models::docente::EstadoDocente,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/docentes",
    responses(
        (status = 200, description = "Paged candidate list"),
        (status = 403, description = "Staff only")
    )
)]
#[axum::debug_handler]
pub async fn list_docentes(
    State(state): State<AppState>,
    Query(query): Query<DocenteListQuery>,
) -> Result<impl IntoResponse> {
    let page = state.docente_service.list(query).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/docentes/{id}",
    params(
        ("id" = i32, Path, description = "Docente ID")
    ),
    responses(
        (status = 200, description = "Profile with areas, evaluation and applications"),
        (status = 403, description = "Another candidate's profile"),
        (status = 404, description = "Docente not found")
    )
)]
#[axum::debug_handler]
pub async fn get_docente(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id_docente): Path<i32>,
) -> Result<impl IntoResponse> {
    session.ensure_can_act_on(id_docente)?;

    let docente = state.docente_service.get(id_docente).await?;
    let actuales = state.area_service.current(id_docente).await?;
    let evaluacion = state.metrica_service.detalle(id_docente).await?;
    let postulaciones = state.docente_service.postulaciones(id_docente).await?;

    Ok(Json(DocentePerfil {
        docente,
        areas: actuales.areas,
        sectores: actuales.sectores,
        evaluacion,
        postulaciones,
    }))
}

#[utoipa::path(
    patch,
    path = "/api/docentes/{id}",
    params(
        ("id" = i32, Path, description = "Docente ID")
    ),
    responses(
        (status = 200, description = "Profile updated"),
        (status = 400, description = "Invalid form or non-image photo"),
        (status = 404, description = "Docente not found")
    )
)]
#[axum::debug_handler]
pub async fn update_docente(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id_docente): Path<i32>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    session.ensure_can_act_on(id_docente)?;

    let mut form = MultipartForm::read(multipart, &state.storage).await?;
    let patch = DocentePatch::from_form(&form)?;
    patch.validate()?;
    let foto = form.take_image(&["fotografia"])?;

    let docente = state
        .docente_service
        .update_profile(id_docente, patch, foto)
        .await?;
    Ok(Json(docente))
}

#[utoipa::path(
    put,
    path = "/api/docentes/{id}/estado",
    params(
        ("id" = i32, Path, description = "Docente ID")
    ),
    responses(
        (status = 200, description = "Status changed"),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Docente not found")
    )
)]
#[axum::debug_handler]
pub async fn update_estado(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id_docente): Path<i32>,
    Json(payload): Json<UpdateEstadoPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let estado = payload
        .estado
        .parse::<EstadoDocente>()
        .map_err(Error::BadRequest)?;

    let docente = state
        .docente_service
        .update_estado(id_docente, estado)
        .await?;
    tracing::info!(
        id_docente,
        estado = %estado,
        by = session.id_docente,
        "status change applied"
    );
    Ok(Json(docente))
}
