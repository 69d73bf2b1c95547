use serde_json::Value;
use std::collections::BTreeMap;

/// Verified access token as handed over by the authentication layer.
///
/// The core only reads claims; signature and lifetime verification happened
/// upstream before this value was constructed.
#[derive(Debug, Clone)]
pub struct AccessToken {
    claims: BTreeMap<String, Value>,
}

impl AccessToken {
    pub fn new(claims: BTreeMap<String, Value>) -> Self {
        Self { claims }
    }

    /// Raw claim value, when present.
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    /// String form of a claim, when present and non-empty after trimming.
    pub fn claim_str(&self, name: &str) -> Option<&str> {
        self.claims
            .get(name)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token(claims: &[(&str, Value)]) -> AccessToken {
        AccessToken::new(
            claims
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
        )
    }

    #[test]
    fn claim_str_ignores_non_strings_and_blanks() {
        let token = token(&[
            ("customer_id", json!(42)),
            ("sub", json!("  ")),
            ("actor", json!("svc@example.test")),
        ]);

        assert_eq!(token.claim_str("customer_id"), None);
        assert_eq!(token.claim_str("sub"), None);
        assert_eq!(token.claim_str("actor"), Some("svc@example.test"));
        assert_eq!(token.claim("customer_id"), Some(&json!(42)));
    }
}
