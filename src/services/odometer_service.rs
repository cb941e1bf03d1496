//! Reconciliador de odómetro
//!
//! Combina el kilometraje almacenado con una lectura suplementaria externa
//! (archivo JSON opcional, emparejado por los últimos 5 caracteres de la
//! matrícula) con la regla "gana el máximo". La ausencia del archivo
//! degrada a usar solo el valor almacenado, con una señal de advertencia
//! al llamador, nunca una falla dura.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::models::reliability::NumericField;

/// Advertencia devuelta por el listado cuando el suplemento no está
pub const ODOMETER_SOURCE_WARNING: &str =
    "Supplementary odometer file not found. Using database km values only.";

/// Lectura cruda del archivo suplementario. `inkm` puede venir como
/// número o como texto; ambas formas se coercionan.
#[derive(Debug, Deserialize)]
struct SupplementaryReading {
    regnno: String,
    inkm: Option<serde_json::Value>,
}

/// Mapa cola-de-matrícula → lectura suplementaria, cargado una vez al
/// arranque. Colas duplicadas conservan la lectura máxima.
#[derive(Debug, Default)]
pub struct OdometerLookup {
    readings: HashMap<String, i64>,
    available: bool,
}

impl OdometerLookup {
    /// Cargar el archivo JSON suplementario. Archivo ausente o ilegible
    /// produce el modo degradado documentado.
    pub fn load(path: &str) -> Self {
        let contents = match fs::read_to_string(Path::new(path)) {
            Ok(contents) => contents,
            Err(e) => {
                log::warn!("⚠️ Archivo de odómetro '{}' no disponible: {}", path, e);
                return Self::unavailable();
            }
        };

        let raw: Vec<SupplementaryReading> = match serde_json::from_str(&contents) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("⚠️ Archivo de odómetro '{}' ilegible: {}", path, e);
                return Self::unavailable();
            }
        };

        let mut readings: HashMap<String, i64> = HashMap::new();
        for reading in raw {
            let km = coerce_json_km(reading.inkm.as_ref());
            let tail = regn_tail(&reading.regnno).to_string();
            readings
                .entry(tail)
                .and_modify(|existing| *existing = (*existing).max(km))
                .or_insert(km);
        }

        tracing::info!("📗 Odómetro suplementario cargado: {} lecturas", readings.len());
        Self {
            readings,
            available: true,
        }
    }

    /// Fuente suplementaria ausente: toda consulta devuelve None
    pub fn unavailable() -> Self {
        Self {
            readings: HashMap::new(),
            available: false,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Lectura suplementaria por coincidencia de cola de matrícula
    pub fn lookup(&self, regnno: &str) -> Option<i64> {
        self.readings.get(regn_tail(regnno)).copied()
    }
}

/// Últimos 5 caracteres de la matrícula (política de emparejamiento difuso)
pub fn regn_tail(regnno: &str) -> &str {
    let chars = regnno.chars().count();
    if chars <= 5 {
        return regnno;
    }
    let (idx, _) = regnno.char_indices().nth(chars - 5).unwrap_or((0, ' '));
    &regnno[idx..]
}

/// Coerción del campo crudo del archivo: número, texto numérico o 0
fn coerce_json_km(value: Option<&serde_json::Value>) -> i64 {
    match value {
        Some(serde_json::Value::Number(n)) => {
            n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)).unwrap_or(0)
        }
        Some(serde_json::Value::String(s)) => NumericField::parse_text(Some(s)).or_zero(),
        _ => 0,
    }
}

/// Resolver el kilometraje final: `max(almacenado_o_0, externo_o_0)`.
/// Entradas no numéricas coercionan a 0 en ambos lados.
pub fn reconcile(stored_inkm: Option<&str>, external: Option<i64>) -> i64 {
    let stored = NumericField::parse_text(stored_inkm).or_zero();
    stored.max(external.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconcile_maximum_wins() {
        assert_eq!(reconcile(Some("38000"), Some(45_000)), 45_000);
        assert_eq!(reconcile(Some("52000"), Some(45_000)), 52_000);
    }

    #[test]
    fn test_reconcile_degraded_source() {
        // Sin fuente externa: el valor almacenado pasa sin modificar
        assert_eq!(reconcile(Some("38000"), None), 38_000);
    }

    #[test]
    fn test_reconcile_coerces_malformed_to_zero() {
        assert_eq!(reconcile(Some("not-a-number"), None), 0);
        assert_eq!(reconcile(None, None), 0);
        assert_eq!(reconcile(Some("abc"), Some(12_000)), 12_000);
    }

    #[test]
    fn test_regn_tail() {
        assert_eq!(regn_tail("DEF12345"), "12345");
        assert_eq!(regn_tail("12345"), "12345");
        assert_eq!(regn_tail("345"), "345");
    }

    #[test]
    fn test_lookup_matches_on_tail() {
        let mut readings = HashMap::new();
        readings.insert("12345".to_string(), 45_000);
        let lookup = OdometerLookup {
            readings,
            available: true,
        };

        // El archivo puede traer la matrícula con otro prefijo
        assert_eq!(lookup.lookup("XX-12345"), Some(45_000));
        assert_eq!(lookup.lookup("DEF12345"), Some(45_000));
        assert_eq!(lookup.lookup("TRK77889"), None);
    }

    #[test]
    fn test_unavailable_lookup() {
        let lookup = OdometerLookup::unavailable();
        assert!(!lookup.is_available());
        assert_eq!(lookup.lookup("DEF12345"), None);
    }

    #[test]
    fn test_load_missing_file_degrades() {
        let lookup = OdometerLookup::load("/nonexistent/RegnInKm.json");
        assert!(!lookup.is_available());
    }

    #[test]
    fn test_coerce_json_km_forms() {
        use serde_json::json;
        assert_eq!(coerce_json_km(Some(&json!(45000))), 45_000);
        assert_eq!(coerce_json_km(Some(&json!("45000"))), 45_000);
        assert_eq!(coerce_json_km(Some(&json!("garbage"))), 0);
        assert_eq!(coerce_json_km(Some(&json!(null))), 0);
        assert_eq!(coerce_json_km(None), 0);
    }
}
