use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::convocatoria_dto::{
        ConvocatoriaForm, ConvocatoriaListQuery, ConvocatoriaPatch, EstadoConvocatoriaPayload,
        PostulacionResponse,
    },
    dto::upload::MultipartForm,
    error::{Error, Result},
    middleware::auth::Session,
    models::convocatoria::{ConvocatoriaConPostulantes, EstadoConvocatoria},
    AppState,
};

/// `imagenPortada` is the form name; `imagen` is still read for older clients.
const IMAGE_FIELDS: [&str; 2] = ["imagenPortada", "imagen"];

/// Candidates only see their own entry in the applicant list.
fn scope_postulantes(session: &Session, item: &mut ConvocatoriaConPostulantes) {
    if !session.is_staff() {
        item.postulantes.retain(|p| p.id_docente == session.id_docente);
    }
}

#[utoipa::path(
    get,
    path = "/api/convocatorias",
    responses(
        (status = 200, description = "Paged list of convocatorias with their applicants"),
        (status = 401, description = "Missing or invalid session")
    )
)]
#[axum::debug_handler]
pub async fn list_convocatorias(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(query): Query<ConvocatoriaListQuery>,
) -> Result<impl IntoResponse> {
    let mut page = state.convocatoria_service.list(query).await?;
    for item in page.items.iter_mut() {
        scope_postulantes(&session, item);
    }
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/convocatorias/{id}",
    params(
        ("id" = i32, Path, description = "Convocatoria ID")
    ),
    responses(
        (status = 200, description = "Convocatoria with its applicants"),
        (status = 404, description = "Convocatoria not found")
    )
)]
#[axum::debug_handler]
pub async fn get_convocatoria(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let mut item = state.convocatoria_service.get(id).await?;
    scope_postulantes(&session, &mut item);
    Ok(Json(item))
}

#[utoipa::path(
    post,
    path = "/api/convocatorias",
    responses(
        (status = 201, description = "Convocatoria created"),
        (status = 400, description = "Invalid form"),
        (status = 403, description = "Staff only")
    )
)]
#[axum::debug_handler]
pub async fn create_convocatoria(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    session.ensure_staff()?;

    let mut form = MultipartForm::read(multipart, &state.storage).await?;
    let payload = ConvocatoriaForm::from_form(&form)?;
    payload.check()?;
    let imagen = form.take_image(&IMAGE_FIELDS)?;

    let convocatoria = state.convocatoria_service.create(payload, imagen).await?;
    Ok((StatusCode::CREATED, Json(convocatoria)))
}

#[utoipa::path(
    put,
    path = "/api/convocatorias/{id}",
    params(
        ("id" = i32, Path, description = "Convocatoria ID")
    ),
    responses(
        (status = 200, description = "Convocatoria updated"),
        (status = 400, description = "Invalid form"),
        (status = 404, description = "Convocatoria not found")
    )
)]
#[axum::debug_handler]
pub async fn update_convocatoria(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    session.ensure_staff()?;

    let mut form = MultipartForm::read(multipart, &state.storage).await?;
    let patch = ConvocatoriaPatch::from_form(&form)?;
    patch.validate()?;
    let imagen = form.take_image(&IMAGE_FIELDS)?;

    let convocatoria = state.convocatoria_service.update(id, patch, imagen).await?;
    Ok(Json(convocatoria))
}

#[utoipa::path(
    put,
    path = "/api/convocatorias/{id}/estado",
    params(
        ("id" = i32, Path, description = "Convocatoria ID")
    ),
    responses(
        (status = 200, description = "Status changed"),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Convocatoria not found")
    )
)]
#[axum::debug_handler]
pub async fn update_estado(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<EstadoConvocatoriaPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let estado = EstadoConvocatoria::parse(&payload.estado)
        .ok_or_else(|| Error::BadRequest(format!("Unknown estado '{}'", payload.estado)))?;
    let convocatoria = state.convocatoria_service.set_estado(id, estado).await?;
    Ok(Json(convocatoria))
}

#[utoipa::path(
    post,
    path = "/api/convocatorias/{id}/postular",
    params(
        ("id" = i32, Path, description = "Convocatoria ID")
    ),
    responses(
        (status = 201, description = "Application recorded"),
        (status = 400, description = "Closed convocatoria or duplicate application"),
        (status = 404, description = "Convocatoria not found")
    )
)]
#[axum::debug_handler]
pub async fn postular(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    if session.is_staff() {
        return Err(Error::Forbidden(
            "Only candidates can apply to a convocatoria".to_string(),
        ));
    }

    state
        .convocatoria_service
        .postular(id, session.id_docente)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(PostulacionResponse {
            message: "Application submitted".to_string(),
            id_convocatoria: id,
            id_docente: session.id_docente,
        }),
    ))
}
