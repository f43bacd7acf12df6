use sqlx::PgPool;

use crate::dto::area_dto::AreasSectoresCatalogo;
use crate::error::Result;
use crate::models::area::{AreaOption, SectorOption};
use crate::models::catalog::{Pais, Profesion, TipoArchivo, TipoPublicacion};
use crate::models::metrica::CriterioEvaluacion;

/// Read-only reference lists used to populate form selectors.
#[derive(Clone)]
pub struct CatalogService {
    pool: PgPool,
}

impl CatalogService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn areas_sectores(&self) -> Result<AreasSectoresCatalogo> {
        let areas = sqlx::query_as::<_, AreaOption>(
            "SELECT id_area AS id, nombre AS categoria FROM areas ORDER BY id_area",
        )
        .fetch_all(&self.pool)
        .await?;
        let sectores = sqlx::query_as::<_, SectorOption>(
            "SELECT id_sector AS id, nombre AS sector FROM sectores ORDER BY id_sector",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(AreasSectoresCatalogo { areas, sectores })
    }

    pub async fn criterios(&self) -> Result<Vec<CriterioEvaluacion>> {
        let items = sqlx::query_as::<_, CriterioEvaluacion>(
            "SELECT id_criterio, criterio, escala FROM criterios_evaluacion ORDER BY id_criterio",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn tipos_archivo(&self) -> Result<Vec<TipoArchivo>> {
        let items = sqlx::query_as::<_, TipoArchivo>("SELECT id_ta, tipo FROM tipos_archivo ORDER BY id_ta")
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    pub async fn tipos_publicacion(&self) -> Result<Vec<TipoPublicacion>> {
        let items = sqlx::query_as::<_, TipoPublicacion>(
            "SELECT id_tipo_publicacion, tipo FROM tipos_publicaciones ORDER BY id_tipo_publicacion",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn profesiones(&self) -> Result<Vec<Profesion>> {
        let items = sqlx::query_as::<_, Profesion>(
            "SELECT id_profesion, nombre_profesion FROM profesiones ORDER BY nombre_profesion",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn paises(&self) -> Result<Vec<Pais>> {
        let items = sqlx::query_as::<_, Pais>("SELECT id_pais, nombre FROM paises ORDER BY nombre")
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }
}
