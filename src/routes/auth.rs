use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    dto::docente_dto::{
        LoginPayload, LoginResponse, RegisterForm, RegisterResponse, CANDIDATE_HOME, STAFF_HOME,
    },
    dto::upload::MultipartForm,
    error::{Error, Result},
    models::docente::{Docente, Role},
    utils::token::TokenSubject,
    AppState,
};

/// Signs a fresh session token for `docente` with the given area flag.
pub(crate) fn token_for(state: &AppState, docente: &Docente, id_area: Option<i32>) -> Result<String> {
    state.tokens.issue(TokenSubject {
        id_docente: docente.id_docente,
        nombre: docente.nombres.clone(),
        apellido_paterno: docente.apellido_paterno.clone(),
        id_rol: docente.id_rol,
        id_area,
    })
}

fn home_for(id_rol: i32) -> &'static str {
    if Role::from_id(id_rol).is_staff() {
        STAFF_HOME
    } else {
        CANDIDATE_HOME
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    responses(
        (status = 201, description = "Candidate registered and signed in"),
        (status = 400, description = "Invalid form or duplicate usuario/correo")
    )
)]
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    tracing::info!("registration request received");
    let mut form = MultipartForm::read(multipart, &state.storage).await?;

    let register = RegisterForm::from_form(&form)?;
    register.validate()?;
    let foto = form.take_image(&["fotografia"])?;

    let docente = state.docente_service.register(register, foto).await?;
    let token = token_for(&state, &docente, None)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful".to_string(),
            token,
            id_docente: docente.id_docente,
            redirect_to: CANDIDATE_HOME.to_string(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    responses(
        (status = 200, description = "Session token and home route"),
        (status = 401, description = "Invalid username or password")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let Some(docente) = state
        .docente_service
        .authenticate(&payload.usuario, &payload.password)
        .await?
    else {
        tracing::info!(usuario = %payload.usuario.trim(), "login rejected");
        return Err(Error::Unauthorized("Invalid username or password".to_string()));
    };

    let id_area = state.area_service.first_area(docente.id_docente).await?;
    let token = token_for(&state, &docente, id_area)?;
    tracing::info!(id_docente = docente.id_docente, "login succeeded");

    Ok(Json(LoginResponse {
        token,
        id_docente: docente.id_docente,
        id_rol: docente.id_rol,
        redirect_to: home_for(docente.id_rol).to_string(),
    }))
}
