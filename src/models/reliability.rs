//! Clasificación de fiabilidad
//!
//! Funciones puras que derivan las tres señales de fiabilidad de un equipo
//! (antigüedad, kilometraje, fallas críticas) y la prioridad compuesta.
//! Ningún camino de entrada produce un panic: los valores ausentes o
//! malformados se clasifican como `Unknown` / `Invalid`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Señal de fiabilidad de un equipo respecto a un criterio individual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Reliable,
    #[serde(rename = "Partially Reliable")]
    PartiallyReliable,
    #[serde(rename = "Not Reliable")]
    NotReliable,
    Unknown,
    Invalid,
}

impl Signal {
    /// Puntaje de la señal para el cálculo de prioridad.
    /// Unknown e Invalid aportan 0, no un valor neutro.
    pub fn score(&self) -> u32 {
        match self {
            Signal::Reliable => 3,
            Signal::PartiallyReliable => 2,
            Signal::NotReliable => 1,
            Signal::Unknown | Signal::Invalid => 0,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Signal::Reliable => "Reliable",
            Signal::PartiallyReliable => "Partially Reliable",
            Signal::NotReliable => "Not Reliable",
            Signal::Unknown => "Unknown",
            Signal::Invalid => "Invalid",
        };
        write!(f, "{}", label)
    }
}

/// Prioridad de atención derivada de las tres señales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    P1,
    P2,
    P3,
    P4,
    P5,
}

impl Priority {
    /// Orden de presentación: P1 primero
    pub fn rank(&self) -> u8 {
        match self {
            Priority::P1 => 1,
            Priority::P2 => 2,
            Priority::P3 => 3,
            Priority::P4 => 4,
            Priority::P5 => 5,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::P1 => "P1",
            Priority::P2 => "P2",
            Priority::P3 => "P3",
            Priority::P4 => "P4",
            Priority::P5 => "P5",
        };
        write!(f, "{}", label)
    }
}

/// Resultado etiquetado de interpretar un campo numérico crudo.
///
/// Reemplaza el try/except de coerción: "no se pudo interpretar" es un
/// valor, nunca una excepción.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    Value(i64),
    Missing,
    Invalid,
}

impl NumericField {
    /// Interpretar un campo de texto opcional como número entero
    pub fn parse_text(raw: Option<&str>) -> Self {
        match raw {
            None => NumericField::Missing,
            Some(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return NumericField::Missing;
                }
                if let Ok(v) = trimmed.parse::<i64>() {
                    return NumericField::Value(v);
                }
                match trimmed.parse::<f64>() {
                    Ok(f) if f.is_finite() => NumericField::Value(f as i64),
                    _ => NumericField::Invalid,
                }
            }
        }
    }

    /// Campo numérico ya tipado (ausencia legal, nunca Invalid)
    pub fn from_opt(value: Option<i64>) -> Self {
        match value {
            Some(v) => NumericField::Value(v),
            None => NumericField::Missing,
        }
    }

    /// Coerción a 0 para el reconciliador de odómetro
    pub fn or_zero(&self) -> i64 {
        match self {
            NumericField::Value(v) => *v,
            NumericField::Missing | NumericField::Invalid => 0,
        }
    }
}

/// Señal de antigüedad: corte inclusivo en 2009, transición en 2015
pub fn classify_vintage(year: NumericField) -> Signal {
    match year {
        NumericField::Missing => Signal::Unknown,
        NumericField::Invalid => Signal::Invalid,
        NumericField::Value(y) => {
            if y <= 2009 {
                Signal::NotReliable
            } else if y < 2015 {
                Signal::PartiallyReliable
            } else {
                Signal::Reliable
            }
        }
    }
}

/// Señal de kilometraje acumulado
pub fn classify_distance(km: NumericField) -> Signal {
    match km {
        NumericField::Missing => Signal::Unknown,
        NumericField::Invalid => Signal::Invalid,
        NumericField::Value(k) => {
            if k <= 40_000 {
                Signal::Reliable
            } else if k <= 90_000 {
                Signal::PartiallyReliable
            } else {
                Signal::NotReliable
            }
        }
    }
}

/// Señal de frecuencia de fallas críticas
pub fn classify_critical_faults(count: NumericField) -> Signal {
    match count {
        NumericField::Missing => Signal::Unknown,
        NumericField::Invalid => Signal::Invalid,
        NumericField::Value(c) => {
            if c <= 2 {
                Signal::Reliable
            } else if c <= 5 {
                Signal::PartiallyReliable
            } else {
                Signal::NotReliable
            }
        }
    }
}

/// Prioridad compuesta: suma de puntajes (0-9) con mapeo fijo a P1-P5.
/// Solo tres señales Reliable (9) alcanzan P1; cualquier señal
/// Unknown/Invalid deprime el puntaje porque aporta 0.
pub fn classify_priority(vintage: Signal, distance: Signal, critical: Signal) -> Priority {
    let score = vintage.score() + distance.score() + critical.score();
    match score {
        9 => Priority::P1,
        8 => Priority::P2,
        7 => Priority::P3,
        6 => Priority::P4,
        _ => Priority::P5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vintage_boundaries() {
        assert_eq!(classify_vintage(NumericField::Value(2009)), Signal::NotReliable);
        assert_eq!(classify_vintage(NumericField::Value(2010)), Signal::PartiallyReliable);
        assert_eq!(classify_vintage(NumericField::Value(2014)), Signal::PartiallyReliable);
        assert_eq!(classify_vintage(NumericField::Value(2015)), Signal::Reliable);
    }

    #[test]
    fn test_vintage_missing_and_invalid() {
        assert_eq!(classify_vintage(NumericField::Missing), Signal::Unknown);
        assert_eq!(classify_vintage(NumericField::Invalid), Signal::Invalid);
    }

    #[test]
    fn test_distance_boundaries() {
        assert_eq!(classify_distance(NumericField::Value(40_000)), Signal::Reliable);
        assert_eq!(classify_distance(NumericField::Value(40_001)), Signal::PartiallyReliable);
        assert_eq!(classify_distance(NumericField::Value(90_000)), Signal::PartiallyReliable);
        assert_eq!(classify_distance(NumericField::Value(90_001)), Signal::NotReliable);
    }

    #[test]
    fn test_critical_fault_boundaries() {
        assert_eq!(classify_critical_faults(NumericField::Value(2)), Signal::Reliable);
        assert_eq!(classify_critical_faults(NumericField::Value(3)), Signal::PartiallyReliable);
        assert_eq!(classify_critical_faults(NumericField::Value(5)), Signal::PartiallyReliable);
        assert_eq!(classify_critical_faults(NumericField::Value(6)), Signal::NotReliable);
    }

    #[test]
    fn test_priority_mapping() {
        assert_eq!(
            classify_priority(Signal::Reliable, Signal::Reliable, Signal::Reliable),
            Priority::P1
        );
        assert_eq!(
            classify_priority(Signal::Unknown, Signal::Unknown, Signal::Unknown),
            Priority::P5
        );
        // 2018 / 45000 km / 1 falla crítica -> 3 + 2 + 3 = 8 -> P2
        let vintage = classify_vintage(NumericField::Value(2018));
        let distance = classify_distance(NumericField::Value(45_000));
        let critical = classify_critical_faults(NumericField::Value(1));
        assert_eq!(classify_priority(vintage, distance, critical), Priority::P2);
    }

    #[test]
    fn test_priority_is_total() {
        let signals = [
            Signal::Reliable,
            Signal::PartiallyReliable,
            Signal::NotReliable,
            Signal::Unknown,
            Signal::Invalid,
        ];
        for v in signals {
            for d in signals {
                for c in signals {
                    // Toda combinación mapea a una prioridad sin panic
                    let _ = classify_priority(v, d, c);
                }
            }
        }
    }

    #[test]
    fn test_numeric_field_parse() {
        assert_eq!(NumericField::parse_text(Some("45000")), NumericField::Value(45_000));
        assert_eq!(NumericField::parse_text(Some(" 38000 ")), NumericField::Value(38_000));
        assert_eq!(NumericField::parse_text(Some("45000.7")), NumericField::Value(45_000));
        assert_eq!(NumericField::parse_text(Some("")), NumericField::Missing);
        assert_eq!(NumericField::parse_text(None), NumericField::Missing);
        assert_eq!(NumericField::parse_text(Some("abc")), NumericField::Invalid);
        assert_eq!(NumericField::parse_text(Some("abc")).or_zero(), 0);
    }

    #[test]
    fn test_signal_serde_labels() {
        let json = serde_json::to_string(&Signal::PartiallyReliable).unwrap();
        assert_eq!(json, "\"Partially Reliable\"");
        let json = serde_json::to_string(&Signal::NotReliable).unwrap();
        assert_eq!(json, "\"Not Reliable\"");
    }
}
