pub mod archivo_service;
pub mod area_service;
pub mod catalog_service;
pub mod convocatoria_service;
pub mod docente_service;
pub mod metrica_service;
pub mod notification_service;
pub mod storage_service;
