// src/services/partidas.rs

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::constantes::tasa_iva,
    models::{
        cotizaciones::{Partida, PartidaBorrador, Totales},
        productos::Producto,
    },
};

/// Totales derivados de las partidas: subtotal = Σ precio × cantidad,
/// IVA al 16% sobre el subtotal, total = subtotal + IVA. Se calcula con
/// precisión completa; el redondeo a dos decimales es cosa de quien
/// presenta o persiste el resultado.
pub fn calcular_totales(partidas: &[PartidaBorrador]) -> Totales {
    let subtotal: Decimal = partidas
        .iter()
        .map(|p| p.precio_unitario * Decimal::from(p.cantidad))
        .sum();
    let iva = subtotal * tasa_iva();
    Totales { subtotal, iva, total: subtotal + iva }
}

// Campo editable de una partida. Cada edición toca exactamente un campo;
// el resto del renglón queda como está.
#[derive(Debug, Clone)]
pub enum CampoPartida {
    Modelo(Option<String>),
    Descripcion(Option<String>),
    PrecioUnitario(Decimal),
    Cantidad(i32),
}

/// Editor en memoria de la lista de partidas de una cotización.
///
/// Mantiene el invariante de numeración densa: después de cualquier
/// mutación, numero_partida es 1..N en el orden de la lista, sin huecos.
#[derive(Debug, Clone, Default)]
pub struct EditorPartidas {
    partidas: Vec<PartidaBorrador>,
}

impl EditorPartidas {
    pub fn nuevo() -> Self {
        Self { partidas: Vec::new() }
    }

    /// Reconstruye el editor desde renglones persistidos (orden de la base).
    pub fn desde_partidas(partidas: Vec<Partida>) -> Self {
        let mut editor = Self {
            partidas: partidas
                .into_iter()
                .map(|p| PartidaBorrador {
                    id: p.id,
                    numero_partida: p.numero_partida,
                    modelo: p.modelo,
                    descripcion: p.descripcion,
                    precio_unitario: p.precio_unitario,
                    cantidad: p.cantidad,
                })
                .collect(),
        };
        editor.renumerar();
        editor
    }

    pub fn desde_borradores(partidas: Vec<PartidaBorrador>) -> Self {
        let mut editor = Self { partidas };
        editor.renumerar();
        editor
    }

    pub fn partidas(&self) -> &[PartidaBorrador] {
        &self.partidas
    }

    pub fn en_partidas(self) -> Vec<PartidaBorrador> {
        self.partidas
    }

    /// Agrega un renglón vacío al final (cantidad 1, precio 0) y
    /// regresa su id local.
    pub fn agregar(&mut self) -> Uuid {
        let id = Uuid::new_v4();
        self.partidas.push(PartidaBorrador {
            id,
            numero_partida: 0,
            modelo: None,
            descripcion: None,
            precio_unitario: Decimal::ZERO,
            cantidad: 1,
        });
        self.renumerar();
        id
    }

    /// Edita un solo campo del renglón indicado. Ids desconocidos se
    /// ignoran: el renglón pudo haberse quitado en otra edición.
    pub fn actualizar(&mut self, id: Uuid, campo: CampoPartida) {
        if let Some(partida) = self.partidas.iter_mut().find(|p| p.id == id) {
            match campo {
                CampoPartida::Modelo(v) => partida.modelo = v,
                CampoPartida::Descripcion(v) => partida.descripcion = v,
                CampoPartida::PrecioUnitario(v) => partida.precio_unitario = v,
                CampoPartida::Cantidad(v) => partida.cantidad = v.max(1),
            }
        }
    }

    /// Quita el renglón y compacta la numeración de los que siguen.
    pub fn quitar(&mut self, id: Uuid) {
        self.partidas.retain(|p| p.id != id);
        self.renumerar();
    }

    /// Autollenado desde el catálogo. Con producto: modelo, descripción
    /// y precio se sobreescriben (aunque el usuario ya hubiera tecleado
    /// algo) y la cantidad se respeta. Sin producto (selección vacía):
    /// el renglón queda exactamente como está, el texto libre es válido.
    pub fn seleccionar_producto(&mut self, id: Uuid, producto: Option<&Producto>) {
        let Some(producto) = producto else { return };
        if let Some(partida) = self.partidas.iter_mut().find(|p| p.id == id) {
            partida.modelo = producto
                .codigo
                .clone()
                .or_else(|| Some(producto.nombre.clone()));
            partida.descripcion = producto.descripcion.clone();
            partida.precio_unitario = producto.precio;
        }
    }

    pub fn totales(&self) -> Totales {
        calcular_totales(&self.partidas)
    }

    fn renumerar(&mut self) {
        for (i, partida) in self.partidas.iter_mut().enumerate() {
            partida.numero_partida = (i + 1) as i32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn borrador(precio: Decimal, cantidad: i32) -> PartidaBorrador {
        PartidaBorrador {
            id: Uuid::new_v4(),
            numero_partida: 0,
            modelo: None,
            descripcion: None,
            precio_unitario: precio,
            cantidad,
        }
    }

    fn producto_catalogo() -> Producto {
        Producto {
            id: Uuid::new_v4(),
            codigo: Some("CAM-DOMO-4MP".to_string()),
            nombre: "Cámara domo 4MP".to_string(),
            descripcion: Some("Cámara domo IP 4MP antivandálica".to_string()),
            precio: dec!(1850.00),
            categoria: Some("Cámaras".to_string()),
            activo: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn totales_caso_de_referencia() {
        // (1000.00 × 2) + (250.50 × 1) = 2250.50; IVA 360.08; total 2610.58
        let partidas = vec![borrador(dec!(1000.00), 2), borrador(dec!(250.50), 1)];
        let totales = calcular_totales(&partidas).redondeado();
        assert_eq!(totales.subtotal, dec!(2250.50));
        assert_eq!(totales.iva, dec!(360.08));
        assert_eq!(totales.total, dec!(2610.58));
    }

    #[test]
    fn totales_lista_vacia_es_cero() {
        let totales = calcular_totales(&[]);
        assert_eq!(totales, Totales::cero());
    }

    #[test]
    fn redondeo_medio_se_aleja_de_cero() {
        // 156.25 × 16% = 25.00 exacto; 156.28125 fuerza el caso .xx5
        let partidas = vec![borrador(dec!(156.28125), 1)];
        let totales = calcular_totales(&partidas);
        assert_eq!(totales.iva, dec!(25.005));
        assert_eq!(totales.redondeado().iva, dec!(25.01));
    }

    #[test]
    fn agregar_asigna_numeracion_densa() {
        let mut editor = EditorPartidas::nuevo();
        editor.agregar();
        editor.agregar();
        editor.agregar();
        let numeros: Vec<i32> = editor.partidas().iter().map(|p| p.numero_partida).collect();
        assert_eq!(numeros, vec![1, 2, 3]);
    }

    #[test]
    fn renglon_nuevo_nace_con_cantidad_uno_y_precio_cero() {
        let mut editor = EditorPartidas::nuevo();
        let id = editor.agregar();
        let partida = editor.partidas().iter().find(|p| p.id == id).unwrap();
        assert_eq!(partida.cantidad, 1);
        assert_eq!(partida.precio_unitario, Decimal::ZERO);
        assert!(partida.modelo.is_none());
    }

    #[test]
    fn quitar_compacta_la_numeracion() {
        let mut editor = EditorPartidas::nuevo();
        let _a = editor.agregar();
        let b = editor.agregar();
        let _c = editor.agregar();
        editor.quitar(b);
        let numeros: Vec<i32> = editor.partidas().iter().map(|p| p.numero_partida).collect();
        assert_eq!(numeros, vec![1, 2]);
    }

    #[test]
    fn actualizar_toca_un_solo_campo() {
        let mut editor = EditorPartidas::nuevo();
        let id = editor.agregar();
        editor.actualizar(id, CampoPartida::Modelo(Some("NVR-16CH".to_string())));
        editor.actualizar(id, CampoPartida::PrecioUnitario(dec!(4500.00)));

        let partida = editor.partidas().iter().find(|p| p.id == id).unwrap();
        assert_eq!(partida.modelo.as_deref(), Some("NVR-16CH"));
        assert_eq!(partida.precio_unitario, dec!(4500.00));
        assert_eq!(partida.cantidad, 1);
        assert!(partida.descripcion.is_none());
    }

    #[test]
    fn actualizar_id_desconocido_no_hace_nada() {
        let mut editor = EditorPartidas::nuevo();
        editor.agregar();
        let copia = editor.partidas().to_vec();
        editor.actualizar(Uuid::new_v4(), CampoPartida::Cantidad(99));
        assert_eq!(editor.partidas(), copia.as_slice());
    }

    #[test]
    fn seleccionar_producto_sobreescribe_y_respeta_cantidad() {
        let mut editor = EditorPartidas::nuevo();
        let id = editor.agregar();
        editor.actualizar(id, CampoPartida::Cantidad(5));
        editor.actualizar(id, CampoPartida::Modelo(Some("texto tecleado".to_string())));

        let producto = producto_catalogo();
        editor.seleccionar_producto(id, Some(&producto));

        let partida = editor.partidas().iter().find(|p| p.id == id).unwrap();
        assert_eq!(partida.modelo.as_deref(), Some("CAM-DOMO-4MP"));
        assert_eq!(
            partida.descripcion.as_deref(),
            Some("Cámara domo IP 4MP antivandálica")
        );
        assert_eq!(partida.precio_unitario, dec!(1850.00));
        assert_eq!(partida.cantidad, 5);
    }

    #[test]
    fn seleccion_vacia_deja_el_renglon_intacto() {
        let mut editor = EditorPartidas::nuevo();
        let id = editor.agregar();
        editor.actualizar(id, CampoPartida::Modelo(Some("equipo a medida".to_string())));
        editor.actualizar(id, CampoPartida::PrecioUnitario(dec!(123.45)));

        editor.seleccionar_producto(id, None);

        let partida = editor.partidas().iter().find(|p| p.id == id).unwrap();
        assert_eq!(partida.modelo.as_deref(), Some("equipo a medida"));
        assert_eq!(partida.precio_unitario, dec!(123.45));
    }

    #[test]
    fn producto_sin_codigo_usa_el_nombre_como_modelo() {
        let mut producto = producto_catalogo();
        producto.codigo = None;

        let mut editor = EditorPartidas::nuevo();
        let id = editor.agregar();
        editor.seleccionar_producto(id, Some(&producto));

        let partida = editor.partidas().iter().find(|p| p.id == id).unwrap();
        assert_eq!(partida.modelo.as_deref(), Some("Cámara domo 4MP"));
    }

    #[test]
    fn desde_borradores_renumera() {
        let mut p1 = borrador(dec!(10), 1);
        let mut p2 = borrador(dec!(20), 1);
        p1.numero_partida = 7;
        p2.numero_partida = 3;
        let editor = EditorPartidas::desde_borradores(vec![p1, p2]);
        let numeros: Vec<i32> = editor.partidas().iter().map(|p| p.numero_partida).collect();
        assert_eq!(numeros, vec![1, 2]);
    }
}
