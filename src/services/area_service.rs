//! Areas-of-interest and sector membership for candidates.
//!
//! Every change runs deletions first and insertions second inside a single transaction, so a
//! failure at any step leaves both join tables exactly as they were. Inserts ignore pairs that
//! already exist and deletes ignore pairs that are not there, which makes re-submitting the
//! same request harmless.

use sqlx::{PgConnection, PgPool};

use crate::dto::area_dto::{AreaChangeCounts, AreaChangeSet, AreasActuales};
use crate::error::{Error, Result};
use crate::models::area::{AreaAsignada, SectorAsignado};

#[derive(Clone)]
pub struct AreaService {
    pool: PgPool,
}

impl AreaService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn current(&self, id_docente: i32) -> Result<AreasActuales> {
        let mut conn = self.pool.acquire().await?;
        current_on(&mut *conn, id_docente).await
    }

    /// Lowest assigned area id, used as the token's `idArea`.
    pub async fn first_area(&self, id_docente: i32) -> Result<Option<i32>> {
        let id = sqlx::query_scalar::<_, i32>(
            "SELECT id_area FROM areas_docentes WHERE id_docente = $1 ORDER BY id_area LIMIT 1",
        )
        .bind(id_docente)
        .fetch_optional(&self.pool)
        .await?;
        Ok(id)
    }

    /// Applies `changes` atomically and returns the resulting membership with the number of
    /// rows each step actually touched.
    pub async fn apply(
        &self,
        id_docente: i32,
        changes: &AreaChangeSet,
    ) -> Result<(AreasActuales, AreaChangeCounts)> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM docentes WHERE id_docente = $1)",
        )
        .bind(id_docente)
        .fetch_one(&mut *tx)
        .await?;
        if !exists {
            return Err(Error::NotFound(format!("Docente {} not found", id_docente)));
        }

        let counts = if changes.is_empty() {
            AreaChangeCounts::default()
        } else {
            match apply_on(&mut *tx, id_docente, changes).await {
                Ok(counts) => counts,
                Err(e) => {
                    tracing::error!(id_docente, error = %e, "area assignment rolled back");
                    // dropping the transaction rolls it back
                    return Err(e);
                }
            }
        };
        let actuales = current_on(&mut *tx, id_docente).await?;
        tx.commit().await?;

        tracing::info!(
            id_docente,
            areas_added = counts.areas_added,
            sectores_added = counts.sectores_added,
            areas_removed = counts.areas_removed,
            sectores_removed = counts.sectores_removed,
            "areas updated"
        );
        Ok((actuales, counts))
    }
}

async fn apply_on(
    conn: &mut PgConnection,
    id_docente: i32,
    changes: &AreaChangeSet,
) -> Result<AreaChangeCounts> {
    let mut counts = AreaChangeCounts::default();

    if !changes.remove_areas.is_empty() {
        counts.areas_removed = sqlx::query(
            "DELETE FROM areas_docentes WHERE id_docente = $1 AND id_area = ANY($2)",
        )
        .bind(id_docente)
        .bind(&changes.remove_areas)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    }
    if !changes.remove_sectores.is_empty() {
        counts.sectores_removed = sqlx::query(
            "DELETE FROM sectores_docentes WHERE id_docente = $1 AND id_sector = ANY($2)",
        )
        .bind(id_docente)
        .bind(&changes.remove_sectores)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    }
    if !changes.add_areas.is_empty() {
        counts.areas_added = sqlx::query(
            "INSERT INTO areas_docentes (id_docente, id_area)
             SELECT $1, UNNEST($2::int[])
             ON CONFLICT DO NOTHING",
        )
        .bind(id_docente)
        .bind(&changes.add_areas)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    }
    if !changes.add_sectores.is_empty() {
        counts.sectores_added = sqlx::query(
            "INSERT INTO sectores_docentes (id_docente, id_sector)
             SELECT $1, UNNEST($2::int[])
             ON CONFLICT DO NOTHING",
        )
        .bind(id_docente)
        .bind(&changes.add_sectores)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    }

    Ok(counts)
}

async fn current_on(conn: &mut PgConnection, id_docente: i32) -> Result<AreasActuales> {
    let areas = sqlx::query_as::<_, AreaAsignada>(
        "SELECT a.id_area, a.nombre AS nombre_area
         FROM areas_docentes ad
         JOIN areas a ON a.id_area = ad.id_area
         WHERE ad.id_docente = $1
         ORDER BY a.id_area",
    )
    .bind(id_docente)
    .fetch_all(&mut *conn)
    .await?;

    let sectores = sqlx::query_as::<_, SectorAsignado>(
        "SELECT s.id_sector, s.nombre AS nombre_sector
         FROM sectores_docentes sd
         JOIN sectores s ON s.id_sector = sd.id_sector
         WHERE sd.id_docente = $1
         ORDER BY s.id_sector",
    )
    .bind(id_docente)
    .fetch_all(&mut *conn)
    .await?;

    Ok(AreasActuales { areas, sectores })
}
