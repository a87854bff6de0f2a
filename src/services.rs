pub mod auth;
pub use auth::AuthService;
pub mod partidas;
pub mod cotizacion_service;
pub use cotizacion_service::CotizacionService;
pub mod pdf_service;
pub use pdf_service::PdfService;
