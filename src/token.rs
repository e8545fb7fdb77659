use crate::address::AccountAddress;
use serde_json::Value;
use std::collections::BTreeMap;

/// Collection every urn-to-earn item is minted into
pub const URN_COLLECTION: &str = "urn";

/// Properties shown next to urn items
pub const SCORE_PROPERTIES: [&str; 2] = ["point", "ash"];

/// Identity of a token in the token standard: creator, collection, name and property version
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TokenId {
    pub creator: AccountAddress,
    pub collection: String,
    pub name: String,
    pub property_version: u64,
}

/// A token balance held by some account
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    id: TokenId,
    amount: u64,
    properties: BTreeMap<String, Value>,
}

impl Token {
    #[allow(missing_docs)]
    pub fn new(id: TokenId, amount: u64) -> Self {
        Token {
            id,
            amount,
            properties: BTreeMap::new(),
        }
    }

    #[allow(missing_docs)]
    pub fn with_property(mut self, key: &str, value: Value) -> Self {
        self.properties.insert(key.to_string(), value);
        self
    }

    #[allow(missing_docs)]
    pub fn id(&self) -> &TokenId {
        &self.id
    }

    #[allow(missing_docs)]
    pub fn name(&self) -> &str {
        &self.id.name
    }

    #[allow(missing_docs)]
    pub fn amount(&self) -> u64 {
        self.amount
    }

    #[allow(missing_docs)]
    pub fn properties(&self) -> &BTreeMap<String, Value> {
        &self.properties
    }

    /// Property value as display text; JSON strings lose their quotes
    pub fn property(&self, key: &str) -> Option<String> {
        self.properties.get(key).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// `point` / `ash` values present on the token
    pub fn score_properties(&self) -> Vec<(&'static str, String)> {
        SCORE_PROPERTIES
            .iter()
            .filter_map(|key| self.property(key).map(|value| (*key, value)))
            .collect()
    }
}

/// The last token in `tokens` named exactly `name`
pub fn find_last_named<'a>(tokens: &'a [Token], name: &str) -> Option<&'a Token> {
    tokens.iter().rev().find(|t| t.name() == name)
}

/// Tokens belonging to the urn collection
pub fn urn_tokens(tokens: Vec<Token>) -> Vec<Token> {
    tokens
        .into_iter()
        .filter(|t| t.id().collection == URN_COLLECTION)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token(collection: &str, name: &str, property_version: u64) -> Token {
        let id = TokenId {
            creator: AccountAddress::ONE,
            collection: collection.to_string(),
            name: name.to_string(),
            property_version,
        };
        Token::new(id, 1)
    }

    #[test]
    fn last_match_wins() {
        let tokens = vec![token("urn", "hip", 1), token("urn", "hip", 7)];
        let found = find_last_named(&tokens, "hip").unwrap();
        assert_eq!(found.id().property_version, 7);
        assert!(find_last_named(&tokens, "skull").is_none());
    }

    #[test]
    fn only_urn_collection_is_kept() {
        let tokens = vec![token("urn", "shovel", 0), token("Aptos", "Aptos Token", 0)];
        let urns = urn_tokens(tokens);
        assert_eq!(urns.len(), 1);
        assert_eq!(urns[0].name(), "shovel");
    }

    #[test]
    fn score_properties_are_unquoted() {
        let urn = token("urn", "urn", 3)
            .with_property("point", json!("12"))
            .with_property("ash", json!(4))
            .with_property("color", json!("grey"));
        assert_eq!(
            urn.score_properties(),
            vec![("point", "12".to_string()), ("ash", "4".to_string())]
        );
    }
}
