pub mod archivo_dto;
pub mod area_dto;
pub mod convocatoria_dto;
pub mod docente_dto;
pub mod metrica_dto;
pub mod notificacion_dto;
pub mod upload;
