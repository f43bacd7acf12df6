pub mod archivos;
pub mod areas;
pub mod auth;
pub mod catalogos;
pub mod convocatorias;
pub mod docentes;
pub mod evaluacion;
pub mod health;
pub mod notificaciones;
pub mod openapi;
