//! The shape a record takes inside a store.
//!
//! Stores never see record types directly. A [`RecordRow`] carries the meta
//! fields as real columns, the payload columns as scalars for querying, and
//! the canonical body text as the source of truth for rehydration. Reading
//! a record back means deserializing the body and reattaching the signature.

use serde::Serialize;
use serde_json::Value;

use veristore_core::error::EncodingError;
use veristore_core::{canonical_json, AddressMask, Recordable, Signable};

/// A queryable column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Integer(i64),
    Real(f64),
    Null,
}

impl Scalar {
    /// Compare two scalars for ordering. Mismatched types and nulls do not
    /// order; nulls only ever match `IsNull`.
    pub fn compare(&self, other: &Scalar) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (Scalar::Text(a), Scalar::Text(b)) => Some(a.cmp(b)),
            (Scalar::Integer(a), Scalar::Integer(b)) => Some(a.cmp(b)),
            (Scalar::Real(a), Scalar::Real(b)) => a.partial_cmp(b),
            (Scalar::Integer(a), Scalar::Real(b)) => (*a as f64).partial_cmp(b),
            (Scalar::Real(a), Scalar::Integer(b)) => a.partial_cmp(&(*b as f64)),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }
}

impl From<&Value> for Scalar {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Scalar::Null,
            Value::Bool(b) => Scalar::Integer(*b as i64),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Scalar::Integer(i)
                } else {
                    Scalar::Real(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => Scalar::Text(s.clone()),
            // Compound payload values are stored as their JSON text.
            other => Scalar::Text(other.to_string()),
        }
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Integer(i)
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Scalar::Real(f)
    }
}

/// A record flattened for storage.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordRow {
    pub id: String,
    pub prefix: String,
    pub sequence_number: u64,
    pub previous: Option<String>,
    pub nonce: Option<String>,
    pub created_at: Option<String>,
    pub signing_identity: Option<String>,
    pub signature: Option<String>,
    /// Payload columns in declared order.
    pub payload: Vec<(String, Scalar)>,
    /// Canonical body text; what hashes and signatures were computed over.
    pub body: String,
}

impl RecordRow {
    /// Flatten an unsigned record.
    pub fn from_record<T>(record: &T) -> Result<Self, EncodingError>
    where
        T: Recordable + Serialize,
    {
        let body = canonical_json(record, AddressMask::None)?;
        let value =
            serde_json::to_value(record).map_err(|e| EncodingError::Serialize(e.to_string()))?;
        let fields = match &value {
            Value::Object(map) => map,
            other => return Err(EncodingError::NotAnObject(other.to_string())),
        };

        let mut payload = Vec::with_capacity(T::COLUMNS.len());
        for &column in T::COLUMNS {
            let value = fields
                .get(column)
                .ok_or(EncodingError::MissingColumn(column))?;
            payload.push((column.to_string(), Scalar::from(value)));
        }

        let meta = record.meta();
        Ok(Self {
            id: meta.id.clone(),
            prefix: meta.prefix.clone(),
            sequence_number: meta.sequence_number,
            previous: meta.previous.clone(),
            nonce: meta.nonce.clone(),
            created_at: meta.created_at.map(|t| t.to_string()),
            signing_identity: None,
            signature: None,
            payload,
            body,
        })
    }

    /// Flatten a signed record, carrying its signature alongside the body.
    pub fn from_signable<T>(record: &T) -> Result<Self, EncodingError>
    where
        T: Signable + Serialize,
    {
        let mut row = Self::from_record(record)?;
        row.signing_identity = record.signing_identity().map(Into::into);
        row.signature = record.signature().map(Into::into);
        Ok(row)
    }

    /// Look up a column by name, meta fields included. Meta fields use
    /// their storage names (`sequence_number`, `created_at`).
    pub fn column(&self, name: &str) -> Option<Scalar> {
        let opt_text = |v: &Option<String>| {
            Some(v.as_ref().map_or(Scalar::Null, |s| Scalar::Text(s.clone())))
        };
        match name {
            "id" => Some(Scalar::Text(self.id.clone())),
            "prefix" => Some(Scalar::Text(self.prefix.clone())),
            "sequence_number" => Some(Scalar::Integer(self.sequence_number as i64)),
            "previous" => opt_text(&self.previous),
            "nonce" => opt_text(&self.nonce),
            "created_at" => opt_text(&self.created_at),
            "signing_identity" => opt_text(&self.signing_identity),
            _ => self
                .payload
                .iter()
                .find(|(col, _)| col == name)
                .map(|(_, scalar)| scalar.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;
    use veristore_core::VersionMeta;

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct Reading {
        #[serde(flatten)]
        meta: VersionMeta,
        sensor: String,
        celsius: f64,
        samples: i64,
    }

    impl Recordable for Reading {
        const TABLE: &'static str = "readings";
        const COLUMNS: &'static [&'static str] = &["sensor", "celsius", "samples"];

        fn meta(&self) -> &VersionMeta {
            &self.meta
        }

        fn meta_mut(&mut self) -> &mut VersionMeta {
            &mut self.meta
        }
    }

    fn reading() -> Reading {
        Reading {
            meta: VersionMeta {
                id: "Eid".into(),
                prefix: "Eprefix".into(),
                sequence_number: 2,
                previous: Some("Eprev".into()),
                nonce: None,
                created_at: None,
            },
            sensor: "attic".into(),
            celsius: 19.5,
            samples: 4,
        }
    }

    #[test]
    fn test_payload_scalars_typed() {
        let row = RecordRow::from_record(&reading()).unwrap();
        assert_eq!(row.column("sensor"), Some(Scalar::Text("attic".into())));
        assert_eq!(row.column("celsius"), Some(Scalar::Real(19.5)));
        assert_eq!(row.column("samples"), Some(Scalar::Integer(4)));
    }

    #[test]
    fn test_meta_columns_resolvable() {
        let row = RecordRow::from_record(&reading()).unwrap();
        assert_eq!(row.column("sequence_number"), Some(Scalar::Integer(2)));
        assert_eq!(row.column("nonce"), Some(Scalar::Null));
        assert_eq!(row.column("no_such_column"), None);
    }

    #[test]
    fn test_body_is_canonical() {
        let r = reading();
        let row = RecordRow::from_record(&r).unwrap();
        assert_eq!(
            row.body,
            canonical_json(&r, AddressMask::None).unwrap()
        );
    }

    #[test]
    fn test_scalar_ordering() {
        assert_eq!(
            Scalar::Integer(2).compare(&Scalar::Real(2.5)),
            Some(std::cmp::Ordering::Less)
        );
        assert_eq!(Scalar::Null.compare(&Scalar::Integer(0)), None);
        assert_eq!(
            Scalar::Text("a".into()).compare(&Scalar::Text("b".into())),
            Some(std::cmp::Ordering::Less)
        );
    }
}
