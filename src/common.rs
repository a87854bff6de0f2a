pub mod constantes;
pub mod error;
pub mod formato;
