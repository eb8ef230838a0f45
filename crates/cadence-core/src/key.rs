// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

use cadence_type::PrimaryKey;
use std::fmt::{Display, Formatter};

/// Deterministic string form of a primary key (spec §4.2), used wherever a
/// pk is a map key or persisted in the version side table. The original
/// structured key is not recoverable from this string — nothing downstream
/// needs it back.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CanonicalKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&PrimaryKey> for CanonicalKey {
    fn from(pk: &PrimaryKey) -> Self {
        match pk {
            PrimaryKey::Scalar(v) => CanonicalKey(v.to_string()),
            PrimaryKey::Composite(fields) => {
                let mut names: Vec<&String> = fields.keys().collect();
                names.sort();
                let joined = names
                    .into_iter()
                    .map(|name| format!("{name}={}", fields[name]))
                    .collect::<Vec<_>>()
                    .join("|");
                CanonicalKey(joined)
            }
        }
    }
}

impl From<&str> for CanonicalKey {
    fn from(value: &str) -> Self {
        CanonicalKey(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_type::Value;
    use indexmap::IndexMap;

    #[test]
    fn scalar_key_is_its_display_form() {
        let pk = PrimaryKey::scalar("i1");
        assert_eq!(CanonicalKey::from(&pk).as_str(), "i1");
    }

    #[test]
    fn composite_key_sorts_fields_ascending() {
        let mut fields = IndexMap::new();
        fields.insert("b".to_string(), Value::Int(2));
        fields.insert("a".to_string(), Value::Int(1));
        let pk = PrimaryKey::Composite(fields);
        assert_eq!(CanonicalKey::from(&pk).as_str(), "a=1|b=2");
    }

    #[test]
    fn composite_key_order_is_independent_of_input_order() {
        let mut first = IndexMap::new();
        first.insert("z".to_string(), Value::Text("zz".into()));
        first.insert("a".to_string(), Value::Text("aa".into()));

        let mut second = IndexMap::new();
        second.insert("a".to_string(), Value::Text("aa".into()));
        second.insert("z".to_string(), Value::Text("zz".into()));

        assert_eq!(
            CanonicalKey::from(&PrimaryKey::Composite(first)),
            CanonicalKey::from(&PrimaryKey::Composite(second))
        );
    }
}
