use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Catalog entry as the area selector expects it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AreaOption {
    pub id: i32,
    pub categoria: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SectorOption {
    pub id: i32,
    pub sector: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AreaAsignada {
    pub id_area: i32,
    pub nombre_area: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SectorAsignado {
    pub id_sector: i32,
    pub nombre_sector: String,
}
