// src/services/pdf_service.rs

use std::path::{Path, PathBuf};

use genpdf::{elements, style, Element};

use rust_decimal::Decimal;

use crate::{
    common::{
        constantes::{tasa_iva, ESLOGAN_EMPRESA, PIE_DE_PAGINA},
        error::AppError,
        formato::{formatear_fecha_larga, formatear_moneda},
    },
    models::{
        configuracion::Configuracion,
        cotizaciones::{Cotizacion, CotizacionDetalle, Partida, Totales},
    },
};

/// Nombre del archivo que se ofrece en la descarga: Cotizacion-<folio>.pdf
pub fn nombre_archivo(numero_cotizacion: i32) -> String {
    format!("Cotizacion-{}.pdf", numero_cotizacion)
}

// Secciones narrativas en el orden del documento. Las vacías o de puros
// espacios no aparecen en el PDF.
fn secciones_narrativas(cotizacion: &Cotizacion) -> Vec<(&'static str, &str)> {
    [
        ("Alcance del trabajo", cotizacion.alcance_trabajo.as_deref()),
        ("Exclusiones", cotizacion.exclusiones.as_deref()),
        ("Observaciones", cotizacion.observaciones.as_deref()),
        ("Condiciones de pago", cotizacion.condiciones_pago.as_deref()),
        ("Capacitación", cotizacion.capacitacion.as_deref()),
    ]
    .into_iter()
    .filter_map(|(titulo, texto)| match texto {
        Some(t) if !t.trim().is_empty() => Some((titulo, t)),
        _ => None,
    })
    .collect()
}

// Totales del documento, rederivados de los renglones ya persistidos
fn totales_de_partidas(partidas: &[Partida]) -> Totales {
    let subtotal: Decimal = partidas.iter().map(|p| p.subtotal()).sum();
    let iva = subtotal * tasa_iva();
    Totales { subtotal, iva, total: subtotal + iva }.redondeado()
}

// Celdas de un renglón de la tabla de partidas
fn fila_partida(partida: &Partida) -> [String; 6] {
    [
        partida.numero_partida.to_string(),
        partida.modelo.clone().unwrap_or_default(),
        partida.descripcion.clone().unwrap_or_default(),
        formatear_moneda(partida.precio_unitario),
        partida.cantidad.to_string(),
        formatear_moneda(partida.subtotal()),
    ]
}

#[derive(Clone)]
pub struct PdfService {
    uploads_dir: PathBuf,
}

impl PdfService {
    pub fn new(uploads_dir: PathBuf) -> Self {
        Self { uploads_dir }
    }

    pub fn generar(
        &self,
        detalle: &CotizacionDetalle,
        config: &Configuracion,
    ) -> Result<Vec<u8>, AppError> {
        let cotizacion = &detalle.cotizacion;
        let cliente = &detalle.cliente;

        // Carga la fuente de la carpeta 'fonts/'
        let font_family = genpdf::fonts::from_files("./fonts", "Roboto", None)
            .map_err(|_| AppError::FontNotFound("Fuente no encontrada en ./fonts".to_string()))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Cotización #{}", cotizacion.numero_cotizacion));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- MEMBRETE ---
        // El logo es opcional; si el archivo no está o no se puede leer,
        // el documento sale sin él.
        if let Some(ruta) = config.logo_url.as_deref().and_then(|url| self.ruta_logo(url)) {
            match image::open(&ruta) {
                Ok(dynamic_image) => {
                    let logo = genpdf::elements::Image::from_dynamic_image(dynamic_image)
                        .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?
                        .with_scale(genpdf::Scale::new(0.5, 0.5));
                    doc.push(logo);
                }
                Err(e) => {
                    tracing::warn!("No se pudo leer el logo en {:?}: {}", ruta, e);
                }
            }
        }

        doc.push(
            elements::Paragraph::new(&config.nombre_empresa)
                .styled(style::Style::new().bold().with_font_size(18)),
        );
        doc.push(
            elements::Paragraph::new(ESLOGAN_EMPRESA)
                .styled(style::Style::new().with_font_size(10)),
        );

        doc.push(elements::Break::new(1.5));

        let mut titulo_doc = elements::Paragraph::new("COTIZACIÓN");
        titulo_doc.set_alignment(genpdf::Alignment::Right);
        doc.push(titulo_doc.styled(style::Style::new().bold().with_font_size(14)));

        let mut folio = elements::Paragraph::new(format!("No. {}", cotizacion.numero_cotizacion));
        folio.set_alignment(genpdf::Alignment::Right);
        doc.push(folio);

        let mut fecha = elements::Paragraph::new(format!(
            "Fecha: {}",
            formatear_fecha_larga(cotizacion.fecha_emision)
        ));
        fecha.set_alignment(genpdf::Alignment::Right);
        doc.push(fecha);

        if let Some(vigencia) = cotizacion.fecha_vigencia {
            let mut linea = elements::Paragraph::new(format!(
                "Vigencia: {}",
                formatear_fecha_larga(vigencia)
            ));
            linea.set_alignment(genpdf::Alignment::Right);
            doc.push(linea);
        }

        doc.push(elements::Break::new(1.5));

        // --- DATOS DEL CLIENTE ---
        // Las líneas opcionales se omiten por completo cuando vienen vacías
        doc.push(
            elements::Paragraph::new("DATOS DEL CLIENTE")
                .styled(style::Style::new().bold().with_font_size(11)),
        );
        doc.push(elements::Paragraph::new(format!("Cliente: {}", cliente.nombre)));
        if let Some(razon_social) = &cliente.razon_social {
            doc.push(elements::Paragraph::new(format!("Razón social: {}", razon_social)));
        }
        if let Some(rfc) = &cliente.rfc {
            doc.push(elements::Paragraph::new(format!("RFC: {}", rfc)));
        }
        if let Some(email) = &cliente.email {
            doc.push(elements::Paragraph::new(format!("Email: {}", email)));
        }
        if let Some(telefono) = &cliente.telefono {
            doc.push(elements::Paragraph::new(format!("Teléfono: {}", telefono)));
        }

        doc.push(elements::Break::new(1.5));

        // --- PROYECTO ---
        doc.push(
            elements::Paragraph::new("PROYECTO")
                .styled(style::Style::new().bold().with_font_size(11)),
        );
        doc.push(elements::Paragraph::new(cotizacion.titulo.clone()));
        if let Some(realizado_por) = &cotizacion.realizado_por {
            doc.push(elements::Paragraph::new(format!("Elaborado por: {}", realizado_por)));
        }

        doc.push(elements::Break::new(1.5));

        // --- TABLA DE PARTIDAS ---
        doc.push(
            elements::Paragraph::new("PARTIDAS")
                .styled(style::Style::new().bold().with_font_size(11)),
        );
        // Pesos: No. (1), Modelo (2), Descripción (4), P. unitario (2),
        // Cantidad (1), Subtotal (2)
        let mut table = elements::TableLayout::new(vec![1, 2, 4, 2, 1, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("No.").styled(style_bold))
            .element(elements::Paragraph::new("Modelo").styled(style_bold))
            .element(elements::Paragraph::new("Descripción").styled(style_bold))
            .element(elements::Paragraph::new("P. unitario").styled(style_bold))
            .element(elements::Paragraph::new("Cant.").styled(style_bold))
            .element(elements::Paragraph::new("Subtotal").styled(style_bold))
            .push()
            .expect("Table error");

        for partida in &detalle.partidas {
            let [numero, modelo, descripcion, precio, cantidad, subtotal] =
                fila_partida(partida);
            table
                .row()
                .element(elements::Paragraph::new(numero))
                .element(elements::Paragraph::new(modelo))
                .element(elements::Paragraph::new(descripcion))
                .element(elements::Paragraph::new(precio))
                .element(elements::Paragraph::new(cantidad))
                .element(elements::Paragraph::new(subtotal))
                .push()
                .expect("Table row error");
        }

        doc.push(table);
        doc.push(elements::Break::new(1));

        // --- TOTALES ---
        // Siempre rederivados de las partidas impresas, no de la
        // fotografía persistida
        let totales = totales_de_partidas(&detalle.partidas);
        for (etiqueta, monto, negritas) in [
            ("Subtotal", totales.subtotal, false),
            ("IVA (16%)", totales.iva, false),
            ("TOTAL", totales.total, true),
        ] {
            let mut parrafo = elements::Paragraph::new(format!(
                "{}: {}",
                etiqueta,
                formatear_moneda(monto)
            ));
            parrafo.set_alignment(genpdf::Alignment::Right);
            if negritas {
                doc.push(parrafo.styled(style::Style::new().bold().with_font_size(12)));
            } else {
                doc.push(parrafo);
            }
        }

        // --- SECCIONES NARRATIVAS ---
        for (titulo, texto) in secciones_narrativas(cotizacion) {
            doc.push(elements::Break::new(1.5));
            doc.push(
                elements::Paragraph::new(titulo)
                    .styled(style::Style::new().bold().with_font_size(11)),
            );
            // Párrafos separados por línea para respetar los saltos capturados
            for linea in texto.lines() {
                doc.push(elements::Paragraph::new(linea.to_string()));
            }
        }

        // --- PIE ---
        doc.push(elements::Break::new(2));
        let mut pie = elements::Paragraph::new(PIE_DE_PAGINA);
        pie.set_alignment(genpdf::Alignment::Center);
        doc.push(pie.styled(style::Style::new().italic().with_font_size(8)));

        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        Ok(buffer)
    }

    // Resuelve la URL pública del logo ("/uploads/archivo.png") al
    // archivo en disco. Solo se toma el nombre del archivo, cualquier
    // intento de ruta relativa se descarta.
    fn ruta_logo(&self, logo_url: &str) -> Option<PathBuf> {
        let nombre = Path::new(logo_url).file_name()?;
        Some(self.uploads_dir.join(nombre))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use crate::models::cotizaciones::CotizacionStatus;

    fn cotizacion_base() -> Cotizacion {
        Cotizacion {
            id: Uuid::new_v4(),
            numero_cotizacion: 1024,
            titulo: "Instalación CCTV Sucursal Centro".to_string(),
            cliente_id: Uuid::new_v4(),
            created_by: None,
            realizado_por: None,
            fecha_emision: NaiveDate::from_ymd_opt(2026, 1, 12).unwrap(),
            fecha_vigencia: None,
            alcance_trabajo: None,
            exclusiones: None,
            observaciones: None,
            condiciones_pago: None,
            capacitacion: None,
            status: CotizacionStatus::Borrador,
            subtotal: dec!(2250.50),
            iva: dec!(360.08),
            total: dec!(2610.58),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn partida(precio: Decimal, cantidad: i32) -> Partida {
        Partida {
            id: Uuid::new_v4(),
            cotizacion_id: Uuid::new_v4(),
            numero_partida: 1,
            modelo: None,
            descripcion: None,
            precio_unitario: precio,
            cantidad,
            orden: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn nombre_de_archivo_lleva_el_folio() {
        assert_eq!(nombre_archivo(1024), "Cotizacion-1024.pdf");
    }

    #[test]
    fn totales_del_documento_salen_de_los_renglones() {
        let partidas = vec![partida(dec!(1000.00), 2), partida(dec!(250.50), 1)];
        let totales = totales_de_partidas(&partidas);
        assert_eq!(totales.subtotal, dec!(2250.50));
        assert_eq!(totales.iva, dec!(360.08));
        assert_eq!(totales.total, dec!(2610.58));
        assert_eq!(formatear_moneda(totales.total), "$2,610.58");
    }

    #[test]
    fn cotizacion_sin_renglones_totaliza_cero() {
        let totales = totales_de_partidas(&[]);
        assert_eq!(totales.subtotal, Decimal::ZERO);
        assert_eq!(totales.iva, Decimal::ZERO);
        assert_eq!(totales.total, Decimal::ZERO);
    }

    #[test]
    fn secciones_vacias_no_aparecen() {
        let mut cotizacion = cotizacion_base();
        cotizacion.alcance_trabajo = Some("Instalación de 8 cámaras".to_string());
        cotizacion.exclusiones = Some("   ".to_string());
        cotizacion.condiciones_pago = Some("50% de anticipo".to_string());

        let secciones = secciones_narrativas(&cotizacion);
        let titulos: Vec<&str> = secciones.iter().map(|(t, _)| *t).collect();
        assert_eq!(titulos, vec!["Alcance del trabajo", "Condiciones de pago"]);
    }

    #[test]
    fn secciones_conservan_el_orden_del_documento() {
        let mut cotizacion = cotizacion_base();
        cotizacion.capacitacion = Some("Capacitación al personal".to_string());
        cotizacion.alcance_trabajo = Some("Alcance".to_string());

        let secciones = secciones_narrativas(&cotizacion);
        assert_eq!(secciones[0].0, "Alcance del trabajo");
        assert_eq!(secciones[1].0, "Capacitación");
    }

    #[test]
    fn fila_formatea_moneda_y_subtotal() {
        let partida = Partida {
            id: Uuid::new_v4(),
            cotizacion_id: Uuid::new_v4(),
            numero_partida: 1,
            modelo: Some("CAM-DOMO-4MP".to_string()),
            descripcion: None,
            precio_unitario: dec!(1850.00),
            cantidad: 2,
            orden: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let fila = fila_partida(&partida);
        assert_eq!(fila[0], "1");
        assert_eq!(fila[1], "CAM-DOMO-4MP");
        assert_eq!(fila[2], "");
        assert_eq!(fila[3], "$1,850.00");
        assert_eq!(fila[4], "2");
        assert_eq!(fila[5], "$3,700.00");
    }

    #[test]
    fn ruta_del_logo_ignora_directorios() {
        let service = PdfService::new(PathBuf::from("/var/uploads"));
        assert_eq!(
            service.ruta_logo("/uploads/logo.png"),
            Some(PathBuf::from("/var/uploads/logo.png"))
        );
        assert_eq!(
            service.ruta_logo("/uploads/../../etc/passwd"),
            Some(PathBuf::from("/var/uploads/passwd"))
        );
    }
}
