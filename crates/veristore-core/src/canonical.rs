//! Canonical serialization.
//!
//! Hashing and signing both operate on a single canonical text form: a
//! compact JSON object whose keys appear in a fixed order, meta fields first
//! and then the record's declared columns. Absent optional fields are
//! omitted entirely. Two records with equal content always produce the same
//! bytes, regardless of how their in-memory representation was built.

use serde::Serialize;
use serde_json::Value;

use crate::encoding::ADDRESS_PLACEHOLDER;
use crate::error::EncodingError;
use crate::record::Recordable;

/// Meta keys, in the order they appear in the canonical form.
const META_KEYS: &[&str] = &[
    "id",
    "prefix",
    "sequenceNumber",
    "previous",
    "nonce",
    "createdAt",
    "signingIdentity",
];

/// Which address fields to replace with the placeholder while serializing.
///
/// Hashing a record requires the hashed-over fields to hold a value of known
/// content; the placeholder stands in for the digest that does not exist yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMask {
    /// Serialize fields as stored. Used for signing and for storage.
    None,
    /// Replace `id`. Used when deriving or checking a version's address.
    Id,
    /// Replace `id` and `prefix`. Used at genesis, where the prefix is
    /// derived from the same digest as the address.
    IdAndPrefix,
}

/// Render a record into its canonical text form.
pub fn canonical_json<T>(record: &T, mask: AddressMask) -> Result<String, EncodingError>
where
    T: Recordable + Serialize,
{
    let value = serde_json::to_value(record).map_err(|e| EncodingError::Serialize(e.to_string()))?;
    let mut fields = match value {
        Value::Object(map) => map,
        other => return Err(EncodingError::NotAnObject(other.to_string())),
    };

    let mut out = String::from("{");
    let mut first = true;

    let mut push = |out: &mut String, first: &mut bool, key: &str, rendered: String| {
        if !*first {
            out.push(',');
        }
        *first = false;
        out.push('"');
        out.push_str(key);
        out.push_str("\":");
        out.push_str(&rendered);
    };

    for &key in META_KEYS {
        let masked = match (key, mask) {
            ("id", AddressMask::Id | AddressMask::IdAndPrefix) => true,
            ("prefix", AddressMask::IdAndPrefix) => true,
            _ => false,
        };
        if masked {
            fields.remove(key);
            push(
                &mut out,
                &mut first,
                key,
                format!("\"{ADDRESS_PLACEHOLDER}\""),
            );
            continue;
        }
        if let Some(value) = fields.remove(key) {
            let rendered =
                serde_json::to_string(&value).map_err(|e| EncodingError::Serialize(e.to_string()))?;
            push(&mut out, &mut first, key, rendered);
        }
    }

    for &column in T::COLUMNS {
        let value = fields
            .remove(column)
            .ok_or(EncodingError::MissingColumn(column))?;
        let rendered =
            serde_json::to_string(&value).map_err(|e| EncodingError::Serialize(e.to_string()))?;
        push(&mut out, &mut first, column, rendered);
    }

    if let Some(leftover) = fields.keys().next() {
        return Err(EncodingError::UndeclaredColumn(leftover.clone()));
    }

    out.push('}');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::record::VersionMeta;

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct Widget {
        #[serde(flatten)]
        meta: VersionMeta,
        foo: String,
        bar: String,
    }

    impl Recordable for Widget {
        const TABLE: &'static str = "widgets";
        const COLUMNS: &'static [&'static str] = &["foo", "bar"];

        fn meta(&self) -> &VersionMeta {
            &self.meta
        }

        fn meta_mut(&mut self) -> &mut VersionMeta {
            &mut self.meta
        }
    }

    fn widget() -> Widget {
        Widget {
            meta: VersionMeta {
                id: "Eid".into(),
                prefix: "Epre".into(),
                sequence_number: 1,
                previous: Some("Eprev".into()),
                nonce: Some("0Anonce".into()),
                created_at: None,
            },
            foo: "bar".into(),
            bar: "foo".into(),
        }
    }

    #[test]
    fn test_fixed_key_order() {
        let json = canonical_json(&widget(), AddressMask::None).unwrap();
        assert_eq!(
            json,
            r#"{"id":"Eid","prefix":"Epre","sequenceNumber":1,"previous":"Eprev","nonce":"0Anonce","foo":"bar","bar":"foo"}"#
        );
    }

    #[test]
    fn test_id_mask_substitutes_placeholder() {
        let json = canonical_json(&widget(), AddressMask::Id).unwrap();
        assert!(json.starts_with(&format!(r#"{{"id":"{ADDRESS_PLACEHOLDER}","prefix":"Epre""#)));
    }

    #[test]
    fn test_genesis_mask_covers_prefix_too() {
        let json = canonical_json(&widget(), AddressMask::IdAndPrefix).unwrap();
        assert_eq!(json.matches(ADDRESS_PLACEHOLDER).count(), 2);
    }

    #[test]
    fn test_absent_optionals_are_omitted() {
        let mut w = widget();
        w.meta.previous = None;
        w.meta.nonce = None;
        let json = canonical_json(&w, AddressMask::None).unwrap();
        assert!(!json.contains("previous"));
        assert!(!json.contains("nonce"));
    }

    #[test]
    fn test_undeclared_field_rejected() {
        #[derive(Serialize)]
        struct Sneaky {
            #[serde(flatten)]
            meta: VersionMeta,
            foo: String,
            bar: String,
            baz: String,
        }

        impl Recordable for Sneaky {
            const TABLE: &'static str = "widgets";
            const COLUMNS: &'static [&'static str] = &["foo", "bar"];

            fn meta(&self) -> &VersionMeta {
                &self.meta
            }

            fn meta_mut(&mut self) -> &mut VersionMeta {
                &mut self.meta
            }
        }

        let sneaky = Sneaky {
            meta: VersionMeta::default(),
            foo: "a".into(),
            bar: "b".into(),
            baz: "c".into(),
        };
        assert!(matches!(
            canonical_json(&sneaky, AddressMask::None),
            Err(EncodingError::UndeclaredColumn(col)) if col == "baz"
        ));
    }

    #[test]
    fn test_missing_column_rejected() {
        #[derive(Serialize)]
        struct Bare {
            #[serde(flatten)]
            meta: VersionMeta,
        }

        impl Recordable for Bare {
            const TABLE: &'static str = "widgets";
            const COLUMNS: &'static [&'static str] = &["foo"];

            fn meta(&self) -> &VersionMeta {
                &self.meta
            }

            fn meta_mut(&mut self) -> &mut VersionMeta {
                &mut self.meta
            }
        }

        let bare = Bare {
            meta: VersionMeta::default(),
        };
        assert!(matches!(
            canonical_json(&bare, AddressMask::None),
            Err(EncodingError::MissingColumn("foo"))
        ));
    }
}
