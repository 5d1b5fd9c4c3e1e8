//! Item model: the unit of indexing.

use crate::error::{IndexError, IndexResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Identifier of an item.
///
/// Accepts a JSON string or number and writes it back in the same form, so a
/// stored item decodes to exactly what was indexed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(serde_json::Number),
    Text(String),
}

impl ItemId {
    /// The string used as hash field and sorted-set member in the store.
    pub fn as_key(&self) -> String {
        self.to_string()
    }

    fn is_blank(&self) -> bool {
        matches!(self, ItemId::Text(text) if text.is_empty())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{}", number),
            Self::Text(text) => write!(f, "{}", text),
        }
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        ItemId::Text(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        ItemId::Text(value)
    }
}

impl From<u64> for ItemId {
    fn from(value: u64) -> Self {
        ItemId::Number(value.into())
    }
}

impl From<i64> for ItemId {
    fn from(value: i64) -> Self {
        ItemId::Number(value.into())
    }
}

/// An indexable item.
///
/// Fields other than `id`, `term`, `aliases` and `score` are carried through
/// to the raw item store untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier within a namespace
    pub id: ItemId,

    /// Primary searchable phrase
    pub term: String,

    /// Additional phrases indexed for the same item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Vec<String>>,

    /// Rank within each prefix's postings
    #[serde(default)]
    pub score: f64,

    /// Opaque payload
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    /// Create an item with a zero score and no aliases.
    pub fn new(id: impl Into<ItemId>, term: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            term: term.into(),
            aliases: None,
            score: 0.0,
            extra: Map::new(),
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = Some(aliases.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Build an item from an untyped JSON document.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::MalformedItem` when the document is not an object,
    /// lacks `id` or `term`, or has fields of the wrong shape.
    pub fn from_value(value: Value) -> IndexResult<Self> {
        let Value::Object(object) = &value else {
            return Err(IndexError::MalformedItem(
                "Items must be JSON objects.".to_string(),
            ));
        };
        if !(object.contains_key("id") && object.contains_key("term")) {
            return Err(IndexError::MalformedItem(
                "Items must at least specify both an id and a term.".to_string(),
            ));
        }
        let item: Item =
            serde_json::from_value(value).map_err(|e| IndexError::MalformedItem(e.to_string()))?;
        item.validate()?;
        Ok(item)
    }

    /// Check the invariants serde cannot express.
    pub fn validate(&self) -> IndexResult<()> {
        if self.id.is_blank() {
            return Err(IndexError::MalformedItem(
                "Item id cannot be empty.".to_string(),
            ));
        }
        if !self.score.is_finite() {
            return Err(IndexError::MalformedItem(format!(
                "Item {} has a non-finite score.",
                self.id
            )));
        }
        Ok(())
    }

    /// The phrase prefixes are drawn from: the term, then every alias.
    pub fn phrase(&self) -> String {
        let mut phrase = self.term.clone();
        for alias in self.aliases.iter().flatten() {
            phrase.push(' ');
            phrase.push_str(alias);
        }
        phrase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_phrase_appends_aliases_in_order() {
        let item = Item::new("1", "Madison Square Garden").with_aliases(["MSG", "The Garden"]);
        assert_eq!(item.phrase(), "Madison Square Garden MSG The Garden");

        let item = Item::new("2", "Barclays Center");
        assert_eq!(item.phrase(), "Barclays Center");
    }

    #[test]
    fn test_from_value_defaults_score() {
        let item = Item::from_value(json!({"id": 7, "term": "Cat"})).unwrap();
        assert_eq!(item.id, ItemId::from(7u64));
        assert_eq!(item.score, 0.0);
        assert!(item.aliases.is_none());
    }

    #[test]
    fn test_from_value_missing_fields() {
        for value in [
            json!({"term": "cat"}),
            json!({"id": 1}),
            json!({}),
            json!(["id", "term"]),
        ] {
            let result = Item::from_value(value);
            assert!(matches!(result, Err(IndexError::MalformedItem(_))));
        }
    }

    #[test]
    fn test_from_value_rejects_empty_id() {
        let result = Item::from_value(json!({"id": "", "term": "cat"}));
        assert!(matches!(result, Err(IndexError::MalformedItem(_))));
    }

    #[test]
    fn test_from_value_rejects_wrong_shapes() {
        let result = Item::from_value(json!({"id": 1, "term": 5}));
        assert!(matches!(result, Err(IndexError::MalformedItem(_))));

        let result = Item::from_value(json!({"id": {"nested": true}, "term": "cat"}));
        assert!(matches!(result, Err(IndexError::MalformedItem(_))));
    }

    #[test]
    fn test_extra_fields_round_trip() {
        let original = json!({
            "id": "venue-1",
            "term": "Citi Field",
            "aliases": ["Mets Stadium"],
            "score": 81.5,
            "data": {"city": "New York"},
            "url": "/venues/citi-field"
        });
        let item = Item::from_value(original.clone()).unwrap();
        assert_eq!(item.extra["url"], json!("/venues/citi-field"));
        assert_eq!(serde_json::to_value(&item).unwrap(), original);
    }

    #[test]
    fn test_item_id_keys() {
        assert_eq!(ItemId::from(42u64).as_key(), "42");
        assert_eq!(ItemId::from("abc").as_key(), "abc");
        assert_eq!(serde_json::to_string(&ItemId::from(42u64)).unwrap(), "42");
        assert_eq!(serde_json::to_string(&ItemId::from("42")).unwrap(), "\"42\"");
    }
}
