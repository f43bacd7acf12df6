use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Pais {
    pub id_pais: i32,
    pub nombre: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Profesion {
    pub id_profesion: i32,
    pub nombre_profesion: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TipoArchivo {
    pub id_ta: i32,
    pub tipo: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TipoPublicacion {
    pub id_tipo_publicacion: i32,
    pub tipo: String,
}
