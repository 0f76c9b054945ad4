//! Structured fields returned by the model.
//!
//! JSON keys follow the names requested in the prompt. Absent fields are
//! `null` on the wire and `None` here; nothing is filled in by default except
//! the `altri` list, which is always an array.

use serde::{Deserialize, Deserializer, Serialize};

/// Document fields extracted by the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredResult {
    /// One of `fattura`, `contratto`, `lettera`, `ricevuta`, `altro`.
    #[serde(default)]
    pub tipo_documento: Option<String>,
    #[serde(default)]
    pub data_documento: Option<String>,
    #[serde(default)]
    pub data_scadenza: Option<String>,
    #[serde(default)]
    pub parti_coinvolte: Option<Vec<String>>,
    #[serde(default)]
    pub descrizione: Option<String>,
    #[serde(default)]
    pub importi: Option<Importi>,
}

/// Monetary breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Importi {
    #[serde(default)]
    pub totale: Option<f64>,
    /// Taxable base.
    #[serde(default)]
    pub imponibile: Option<f64>,
    #[serde(default)]
    pub iva: Option<f64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub altri: Vec<AltroImporto>,
}

/// An itemized amount outside total/taxable/tax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AltroImporto {
    #[serde(default)]
    pub descrizione: Option<String>,
    pub valore: f64,
    #[serde(default)]
    pub valuta: Option<String>,
}

/// Result of one pipeline run, as returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extraction {
    pub filename: String,
    pub extracted_features: StructuredResult,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_serialize_as_null() {
        let value = serde_json::to_value(StructuredResult::default()).unwrap();
        assert!(value["tipo_documento"].is_null());
        assert!(value["importi"].is_null());
    }

    #[test]
    fn test_altri_null_becomes_empty() {
        let importi: Importi = serde_json::from_str(r#"{"totale": 10, "altri": null}"#).unwrap();
        assert_eq!(importi.totale, Some(10.0));
        assert!(importi.altri.is_empty());
        let value = serde_json::to_value(&importi).unwrap();
        assert_eq!(value["altri"], serde_json::json!([]));
    }
}
