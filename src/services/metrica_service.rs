use std::collections::HashMap;

use sqlx::{PgConnection, PgPool};

use crate::dto::metrica_dto::{CriterioCotejo, EditarMetricaPayload};
use crate::error::{Error, Result};
use crate::models::metrica::{Escala, Metrica, MetricaCriterio, MetricaDetalle};

/// Every criterion must exist and each rating must belong to the criterion's scale.
pub fn check_ratings(escalas: &HashMap<i32, Escala>, criterios: &[CriterioCotejo]) -> Result<()> {
    let mut seen = Vec::with_capacity(criterios.len());
    for item in criterios {
        if seen.contains(&item.id_criterio) {
            return Err(Error::BadRequest(format!(
                "Criterion {} is rated more than once",
                item.id_criterio
            )));
        }
        seen.push(item.id_criterio);

        let escala = escalas
            .get(&item.id_criterio)
            .ok_or_else(|| Error::BadRequest(format!("Unknown criterion {}", item.id_criterio)))?;
        if item.cotejo.escala() != *escala {
            return Err(Error::BadRequest(format!(
                "Rating '{}' does not apply to criterion {}",
                item.cotejo.as_str(),
                item.id_criterio
            )));
        }
    }
    Ok(())
}

#[derive(Clone)]
pub struct MetricaService {
    pool: PgPool,
}

impl MetricaService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn detalle(&self, id_docente: i32) -> Result<Option<MetricaDetalle>> {
        let metrica = sqlx::query_as::<_, Metrica>(
            "SELECT id_metricas, id_docente, fecha, tipo_evaluacion, observaciones, recomendaciones
             FROM metricas WHERE id_docente = $1",
        )
        .bind(id_docente)
        .fetch_optional(&self.pool)
        .await?;

        let Some(metrica) = metrica else {
            return Ok(None);
        };

        let criterios = sqlx::query_as::<_, MetricaCriterio>(
            "SELECT mc.id_criterio, c.criterio, mc.cotejo
             FROM metricas_criteriosevaluacion mc
             JOIN criterios_evaluacion c ON c.id_criterio = mc.id_criterio
             WHERE mc.id_metrica = $1
             ORDER BY mc.id_criterio",
        )
        .bind(metrica.id_metricas)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(MetricaDetalle { metrica, criterios }))
    }

    /// Inserts the evaluation on first save and updates it afterwards. Returns the record id
    /// and whether it was created.
    pub async fn guardar(&self, id_docente: i32, payload: EditarMetricaPayload) -> Result<(i32, bool)> {
        let mut tx = self.pool.begin().await?;
        check_criterios_on(&mut *tx, &payload.criterios).await?;

        let existing = sqlx::query_scalar::<_, i32>(
            "SELECT id_metricas FROM metricas WHERE id_docente = $1 FOR UPDATE",
        )
        .bind(id_docente)
        .fetch_optional(&mut *tx)
        .await?;

        let (id_metricas, creada) = match existing {
            Some(id) => {
                update_parent_on(&mut *tx, id, &payload).await?;
                (id, false)
            }
            None => {
                let id = sqlx::query_scalar::<_, i32>(
                    "INSERT INTO metricas (id_docente, tipo_evaluacion, observaciones, recomendaciones)
                     VALUES ($1, $2, $3, $4)
                     RETURNING id_metricas",
                )
                .bind(id_docente)
                .bind(&payload.tipo_evaluacion)
                .bind(&payload.observaciones)
                .bind(&payload.recomendaciones)
                .fetch_one(&mut *tx)
                .await?;
                (id, true)
            }
        };

        upsert_ratings_on(&mut *tx, id_metricas, &payload.criterios).await?;
        tx.commit().await?;

        tracing::info!(id_docente, id_metricas, creada, "evaluation saved");
        Ok((id_metricas, creada))
    }

    /// Update-only variant; fails with 404 when the candidate has no evaluation yet.
    pub async fn editar(&self, id_docente: i32, payload: EditarMetricaPayload) -> Result<i32> {
        let mut tx = self.pool.begin().await?;
        check_criterios_on(&mut *tx, &payload.criterios).await?;

        let id_metricas = sqlx::query_scalar::<_, i32>(
            "SELECT id_metricas FROM metricas WHERE id_docente = $1 FOR UPDATE",
        )
        .bind(id_docente)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound(format!("No evaluation for docente {}", id_docente)))?;

        update_parent_on(&mut *tx, id_metricas, &payload).await?;
        upsert_ratings_on(&mut *tx, id_metricas, &payload.criterios).await?;
        tx.commit().await?;

        tracing::info!(id_docente, id_metricas, "evaluation updated");
        Ok(id_metricas)
    }
}

async fn check_criterios_on(conn: &mut PgConnection, criterios: &[CriterioCotejo]) -> Result<()> {
    if criterios.is_empty() {
        return Ok(());
    }
    let ids: Vec<i32> = criterios.iter().map(|c| c.id_criterio).collect();
    let rows = sqlx::query_as::<_, (i32, String)>(
        "SELECT id_criterio, escala FROM criterios_evaluacion WHERE id_criterio = ANY($1)",
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;

    let escalas: HashMap<i32, Escala> = rows
        .into_iter()
        .filter_map(|(id, escala)| Escala::parse(&escala).map(|e| (id, e)))
        .collect();
    check_ratings(&escalas, criterios)
}

async fn update_parent_on(
    conn: &mut PgConnection,
    id_metricas: i32,
    payload: &EditarMetricaPayload,
) -> Result<()> {
    sqlx::query(
        "UPDATE metricas SET
            tipo_evaluacion = COALESCE($2, tipo_evaluacion),
            observaciones = COALESCE($3, observaciones),
            recomendaciones = COALESCE($4, recomendaciones),
            fecha = NOW()
         WHERE id_metricas = $1",
    )
    .bind(id_metricas)
    .bind(&payload.tipo_evaluacion)
    .bind(&payload.observaciones)
    .bind(&payload.recomendaciones)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Only the listed criteria are written; ratings not in the request keep their value.
async fn upsert_ratings_on(
    conn: &mut PgConnection,
    id_metricas: i32,
    criterios: &[CriterioCotejo],
) -> Result<()> {
    for item in criterios {
        sqlx::query(
            "INSERT INTO metricas_criteriosevaluacion (id_metrica, id_criterio, cotejo)
             VALUES ($1, $2, $3)
             ON CONFLICT (id_metrica, id_criterio) DO UPDATE SET cotejo = EXCLUDED.cotejo",
        )
        .bind(id_metricas)
        .bind(item.id_criterio)
        .bind(item.cotejo.as_str())
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::metrica::Cotejo;

    fn escalas() -> HashMap<i32, Escala> {
        HashMap::from([(1, Escala::Valoracion), (5, Escala::Cumplimiento)])
    }

    fn rating(id_criterio: i32, cotejo: Cotejo) -> CriterioCotejo {
        CriterioCotejo { id_criterio, cotejo }
    }

    #[test]
    fn accepts_ratings_matching_each_scale() {
        let criterios = [rating(1, Cotejo::Bueno), rating(5, Cotejo::NoCumple)];
        assert!(check_ratings(&escalas(), &criterios).is_ok());
        assert!(check_ratings(&escalas(), &[]).is_ok());
    }

    #[test]
    fn rejects_wrong_kind_unknown_and_duplicate() {
        assert!(check_ratings(&escalas(), &[rating(1, Cotejo::Cumple)]).is_err());
        assert!(check_ratings(&escalas(), &[rating(5, Cotejo::Excelente)]).is_err());
        assert!(check_ratings(&escalas(), &[rating(9, Cotejo::Bueno)]).is_err());
        assert!(check_ratings(
            &escalas(),
            &[rating(1, Cotejo::Bueno), rating(1, Cotejo::Regular)]
        )
        .is_err());
    }
}
