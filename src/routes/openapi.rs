use axum::Json;
use utoipa::OpenApi;

use crate::routes::{
    archivos, areas, auth, catalogos, convocatorias, docentes, evaluacion, health,
    notificaciones,
};

#[derive(OpenApi)]
#[openapi(
    info(title = "docentes-backend", description = "Teacher recruitment API"),
    paths(
        health::health,
        auth::register,
        auth::login,
        catalogos::areas_sectores,
        catalogos::criterios,
        catalogos::tipos_archivo,
        catalogos::tipos_publicacion,
        catalogos::profesiones,
        catalogos::paises,
        docentes::list_docentes,
        docentes::get_docente,
        docentes::update_docente,
        docentes::update_estado,
        areas::current_areas,
        areas::insertar_areas,
        areas::gestion_areas,
        archivos::list_archivos,
        archivos::create_archivo,
        archivos::update_archivo,
        archivos::delete_archivo,
        convocatorias::list_convocatorias,
        convocatorias::get_convocatoria,
        convocatorias::create_convocatoria,
        convocatorias::update_convocatoria,
        convocatorias::update_estado,
        convocatorias::postular,
        notificaciones::list_notificaciones,
        notificaciones::marcar_leidas,
        evaluacion::get_evaluacion,
        evaluacion::guardar_evaluacion,
        evaluacion::editar_evaluacion,
    )
)]
pub struct ApiDoc;

#[axum::debug_handler]
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert_eq!(paths.len(), 26);
        for path in [
            "/health",
            "/api/auth/register",
            "/api/docentes/{id}",
            "/api/docentes/areas/gestion",
            "/api/archivos/{id}",
            "/api/convocatorias/{id}/postular",
            "/api/notificaciones/leer",
            "/api/evaluacion/{id_docente}",
        ] {
            assert!(paths.contains_key(path), "{} missing", path);
        }
    }
}
