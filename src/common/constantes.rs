// src/common/constantes.rs

use rust_decimal::Decimal;

/// Tasa de IVA fija del 16%. No es configurable en el diseño actual.
pub fn tasa_iva() -> Decimal {
    Decimal::new(16, 2)
}

pub const NOMBRE_EMPRESA_DEFAULT: &str = "CVA Systems";
pub const ESLOGAN_EMPRESA: &str = "Soluciones en Seguridad y Videovigilancia";
pub const PIE_DE_PAGINA: &str =
    "Este documento es una cotización y no representa un compromiso de venta.";

/// Catálogo fijo de regímenes fiscales del SAT (clave, descripción)
pub const REGIMENES_FISCALES: &[(&str, &str)] = &[
    ("601", "General de Ley Personas Morales"),
    ("603", "Personas Morales con Fines no Lucrativos"),
    ("612", "Personas Físicas con Actividades Empresariales"),
    ("616", "Sin obligaciones fiscales"),
    ("621", "Incorporación Fiscal"),
    ("626", "Régimen Simplificado de Confianza"),
];

/// Descripción de un régimen fiscal a partir de su clave.
pub fn descripcion_regimen(clave: &str) -> Option<&'static str> {
    REGIMENES_FISCALES
        .iter()
        .find(|(valor, _)| *valor == clave)
        .map(|(_, etiqueta)| *etiqueta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn iva_es_dieciseis_por_ciento() {
        assert_eq!(tasa_iva(), Decimal::from_str("0.16").unwrap());
    }

    #[test]
    fn regimen_conocido_y_desconocido() {
        assert_eq!(descripcion_regimen("626"), Some("Régimen Simplificado de Confianza"));
        assert_eq!(descripcion_regimen("999"), None);
    }
}
