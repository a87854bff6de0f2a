pub mod auth;
pub mod clientes;
pub mod configuracion;
pub mod cotizaciones;
pub mod productos;
pub mod usuarios;
