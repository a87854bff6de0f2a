pub mod usuarios_repo;
pub use usuarios_repo::UsuariosRepository;
pub mod clientes_repo;
pub use clientes_repo::ClientesRepository;
pub mod productos_repo;
pub use productos_repo::ProductosRepository;
pub mod cotizaciones_repo;
pub use cotizaciones_repo::CotizacionesRepository;
pub mod configuracion_repo;
pub use configuracion_repo::ConfiguracionRepository;
