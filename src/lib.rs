pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};
use url::Url;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::middleware::{
    auth::{require_session, require_staff},
    cors::cors_layer,
    rate_limit::{rps_middleware, RateLimiter},
};
use crate::services::{
    archivo_service::ArchivoService,
    area_service::AreaService,
    catalog_service::CatalogService,
    convocatoria_service::ConvocatoriaService,
    docente_service::DocenteService,
    metrica_service::MetricaService,
    notification_service::NotificationService,
    storage_service::{FileStorage, DOCENTE_FILES_PREFIX, IMAGES_PREFIX},
};
use crate::utils::token::TokenKeys;

/// Multipart overhead allowed on top of the per-file cap, so oversized files reach the
/// handler and get a JSON 400 instead of a transport error.
const BODY_LIMIT_MARGIN: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub tokens: TokenKeys,
    pub storage: FileStorage,
    pub catalog_service: CatalogService,
    pub docente_service: DocenteService,
    pub area_service: AreaService,
    pub convocatoria_service: ConvocatoriaService,
    pub archivo_service: ArchivoService,
    pub notification_service: NotificationService,
    pub metrica_service: MetricaService,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Result<Self> {
        let base_url = Url::parse(&config.public_base_url).map_err(|e| {
            Error::Config(format!(
                "Invalid PUBLIC_BASE_URL '{}': {}",
                config.public_base_url, e
            ))
        })?;
        let tokens = TokenKeys::new(&config.jwt_secret, config.jwt_ttl_minutes);
        let storage = FileStorage::new(config.public_dir.clone(), config.max_upload_bytes);

        Ok(Self {
            catalog_service: CatalogService::new(pool.clone()),
            docente_service: DocenteService::new(pool.clone(), storage.clone()),
            area_service: AreaService::new(pool.clone()),
            convocatoria_service: ConvocatoriaService::new(pool.clone(), storage.clone(), base_url),
            archivo_service: ArchivoService::new(pool.clone(), storage.clone()),
            notification_service: NotificationService::new(pool.clone()),
            metrica_service: MetricaService::new(pool.clone()),
            pool,
            config: Arc::new(config),
            tokens,
            storage,
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    let rps = state.config.api_rps;

    let base_routes = Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/openapi.json", get(routes::openapi::openapi_json));

    let public_api = Router::new()
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login))
        .route(
            "/api/catalogos/areas-sectores",
            get(routes::catalogos::areas_sectores),
        )
        .route("/api/catalogos/criterios", get(routes::catalogos::criterios))
        .route(
            "/api/catalogos/tipos-archivo",
            get(routes::catalogos::tipos_archivo),
        )
        .route(
            "/api/catalogos/tipos-publicacion",
            get(routes::catalogos::tipos_publicacion),
        )
        .route("/api/catalogos/profesiones", get(routes::catalogos::profesiones))
        .route("/api/catalogos/paises", get(routes::catalogos::paises))
        .layer(from_fn_with_state(RateLimiter::new(rps), rps_middleware));

    // any signed-in user; handlers narrow further where needed
    let session_api = Router::new()
        .route(
            "/api/docentes/:id",
            get(routes::docentes::get_docente).patch(routes::docentes::update_docente),
        )
        .route("/api/docentes/:id/areas", get(routes::areas::current_areas))
        .route("/api/docentes/areas", post(routes::areas::insertar_areas))
        .route("/api/docentes/areas/gestion", post(routes::areas::gestion_areas))
        .route(
            "/api/docentes/:id/archivos",
            get(routes::archivos::list_archivos),
        )
        .route("/api/archivos", post(routes::archivos::create_archivo))
        .route(
            "/api/archivos/:id",
            put(routes::archivos::update_archivo).delete(routes::archivos::delete_archivo),
        )
        .route(
            "/api/convocatorias",
            get(routes::convocatorias::list_convocatorias)
                .post(routes::convocatorias::create_convocatoria),
        )
        .route(
            "/api/convocatorias/:id",
            get(routes::convocatorias::get_convocatoria)
                .put(routes::convocatorias::update_convocatoria),
        )
        .route(
            "/api/convocatorias/:id/postular",
            post(routes::convocatorias::postular),
        )
        .route(
            "/api/notificaciones",
            get(routes::notificaciones::list_notificaciones),
        )
        .route(
            "/api/notificaciones/leer",
            put(routes::notificaciones::marcar_leidas),
        )
        .route(
            "/api/evaluacion/:id_docente",
            get(routes::evaluacion::get_evaluacion).put(routes::evaluacion::editar_evaluacion),
        )
        .route_layer(from_fn_with_state(state.clone(), require_session))
        .layer(from_fn_with_state(RateLimiter::new(rps), rps_middleware));

    let staff_api = Router::new()
        .route("/api/docentes", get(routes::docentes::list_docentes))
        .route(
            "/api/docentes/:id/estado",
            put(routes::docentes::update_estado),
        )
        .route(
            "/api/convocatorias/:id/estado",
            put(routes::convocatorias::update_estado),
        )
        .route("/api/evaluacion", post(routes::evaluacion::guardar_evaluacion))
        .route_layer(from_fn_with_state(state.clone(), require_staff))
        .layer(from_fn_with_state(RateLimiter::new(rps), rps_middleware));

    let public_dir = state.config.public_dir.clone();
    let body_limit = state.config.max_upload_bytes + BODY_LIMIT_MARGIN;
    let cors = cors_layer(state.config.cors_origin.as_deref());

    base_routes
        .merge(public_api)
        .merge(session_api)
        .merge(staff_api)
        .nest_service(
            &format!("/{}", IMAGES_PREFIX),
            ServeDir::new(public_dir.join(IMAGES_PREFIX)),
        )
        .nest_service(
            &format!("/{}", DOCENTE_FILES_PREFIX),
            ServeDir::new(public_dir.join(DOCENTE_FILES_PREFIX)),
        )
        .with_state(state)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit))
}
