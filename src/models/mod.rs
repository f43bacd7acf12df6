pub mod archivo;
pub mod area;
pub mod catalog;
pub mod convocatoria;
pub mod docente;
pub mod metrica;
pub mod notificacion;
