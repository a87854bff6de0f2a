// src/common/formato.rs

use chrono::{Locale, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

/// Moneda es-MX: símbolo, separador de miles y dos decimales.
/// Ej: 2610.58 -> "$2,610.58"
pub fn formatear_moneda(monto: Decimal) -> String {
    let redondeado = monto.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negativo = redondeado.is_sign_negative();
    let absoluto = redondeado.abs();

    let texto = format!("{:.2}", absoluto);
    let (entero, decimales) = texto.split_once('.').unwrap_or((texto.as_str(), "00"));

    // Insertamos las comas de miles de derecha a izquierda
    let mut agrupado = String::new();
    for (i, c) in entero.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            agrupado.push(',');
        }
        agrupado.push(c);
    }
    let entero_con_comas: String = agrupado.chars().rev().collect();

    if negativo {
        format!("-${}.{}", entero_con_comas, decimales)
    } else {
        format!("${}.{}", entero_con_comas, decimales)
    }
}

/// Fecha corta dd/MM/yyyy (listados y API)
pub fn formatear_fecha(fecha: NaiveDate) -> String {
    fecha.format("%d/%m/%Y").to_string()
}

/// Fecha larga localizada para el PDF: "12 de enero de 2026"
pub fn formatear_fecha_larga(fecha: NaiveDate) -> String {
    fecha
        .format_localized("%-d de %B de %Y", Locale::es_MX)
        .to_string()
}

/// Normaliza un RFC capturado: mayúsculas, sin espacios, máximo 13 caracteres.
pub fn formatear_rfc(rfc: &str) -> String {
    rfc.to_uppercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .take(13)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn moneda_basica() {
        assert_eq!(formatear_moneda(dec("2610.58")), "$2,610.58");
        assert_eq!(formatear_moneda(dec("0")), "$0.00");
        assert_eq!(formatear_moneda(dec("1000000")), "$1,000,000.00");
    }

    #[test]
    fn moneda_redondea_a_dos_decimales() {
        assert_eq!(formatear_moneda(dec("360.0800")), "$360.08");
        assert_eq!(formatear_moneda(dec("1.005")), "$1.01");
    }

    #[test]
    fn moneda_negativa() {
        assert_eq!(formatear_moneda(dec("-1234.5")), "-$1,234.50");
    }

    #[test]
    fn fecha_corta() {
        let fecha = NaiveDate::from_ymd_opt(2026, 1, 12).unwrap();
        assert_eq!(formatear_fecha(fecha), "12/01/2026");
    }

    #[test]
    fn fecha_larga_en_espanol() {
        let fecha = NaiveDate::from_ymd_opt(2026, 1, 12).unwrap();
        assert_eq!(formatear_fecha_larga(fecha), "12 de enero de 2026");
    }

    #[test]
    fn rfc_se_normaliza() {
        assert_eq!(formatear_rfc(" xaxx 010101 000 "), "XAXX010101000");
        assert_eq!(formatear_rfc("xaxx010101000extra"), "XAXX010101000");
    }
}
