use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};

use crate::{
    dto::archivo_dto::{ArchivoUpdate, MessageResponse, NuevoArchivo},
    dto::upload::MultipartForm,
    error::Result,
    middleware::auth::Session,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/docentes/{id}/archivos",
    params(
        ("id" = i32, Path, description = "Docente ID")
    ),
    responses(
        (status = 200, description = "Uploaded documents"),
        (status = 403, description = "Another candidate's documents")
    )
)]
#[axum::debug_handler]
pub async fn list_archivos(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id_docente): Path<i32>,
) -> Result<impl IntoResponse> {
    session.ensure_can_act_on(id_docente)?;
    let archivos = state.archivo_service.list_for(id_docente).await?;
    Ok(Json(archivos))
}

/// The size cap is enforced while the body is read, before any ownership lookup.
#[utoipa::path(
    post,
    path = "/api/archivos",
    responses(
        (status = 201, description = "Document stored"),
        (status = 400, description = "Invalid form or file too large")
    )
)]
#[axum::debug_handler]
pub async fn create_archivo(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut form = MultipartForm::read(multipart, &state.storage).await?;
    let nuevo = NuevoArchivo::from_form(&mut form)?;
    session.ensure_can_act_on(nuevo.id_docente)?;

    let archivo = state.archivo_service.create(nuevo).await?;
    Ok((StatusCode::CREATED, Json(archivo)))
}

#[utoipa::path(
    put,
    path = "/api/archivos/{id}",
    params(
        ("id" = i32, Path, description = "Archivo ID")
    ),
    responses(
        (status = 200, description = "Document updated"),
        (status = 400, description = "Invalid form or file too large"),
        (status = 404, description = "Archivo not found")
    )
)]
#[axum::debug_handler]
pub async fn update_archivo(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut form = MultipartForm::read(multipart, &state.storage).await?;
    let update = ArchivoUpdate::from_form(&mut form)?;

    let current = state.archivo_service.get(id).await?;
    session.ensure_can_act_on(current.id_docente)?;

    let archivo = state.archivo_service.update(id, update).await?;
    Ok(Json(archivo))
}

#[utoipa::path(
    delete,
    path = "/api/archivos/{id}",
    params(
        ("id" = i32, Path, description = "Archivo ID")
    ),
    responses(
        (status = 200, description = "Document and stored file removed"),
        (status = 404, description = "Archivo not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_archivo(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let current = state.archivo_service.get(id).await?;
    session.ensure_can_act_on(current.id_docente)?;

    state.archivo_service.delete(id).await?;
    Ok(Json(MessageResponse::new("File deleted")))
}
