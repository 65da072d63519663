//! Schema-less document tree produced by evaluating a source model.
//!
//! Source models are authored by third parties and have no fixed schema, so
//! every accessor here is total: a missing or mistyped property yields the
//! caller-provided default instead of an error.

use indexmap::IndexMap;
use serde::Serialize;

/// A node of an evaluated model
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Document {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// Properties in declaration order
    Map(IndexMap<String, Document>),
    List(Vec<Document>),
}

impl Document {
    /// Get a property of a map node
    pub fn get(&self, key: &str) -> Option<&Document> {
        match self {
            Document::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Get an element of a list node
    pub fn index(&self, i: usize) -> Option<&Document> {
        match self {
            Document::List(items) => items.get(i),
            _ => None,
        }
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Document::Map(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Document::List(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Document::Null)
    }

    /// Number of entries of a map or list, 0 for scalars
    pub fn len(&self) -> usize {
        match self {
            Document::Map(map) => map.len(),
            Document::List(items) => items.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Map entries in declaration order (empty for non-maps)
    pub fn entries(&self) -> impl Iterator<Item = (&String, &Document)> {
        match self {
            Document::Map(map) => Some(map.iter()),
            _ => None,
        }
        .into_iter()
        .flatten()
    }

    /// List items in order (empty for non-lists)
    pub fn items(&self) -> impl Iterator<Item = &Document> {
        let items: &[Document] = match self {
            Document::List(items) => items,
            _ => &[],
        };
        items.iter()
    }

    /// Stringify a scalar node.
    ///
    /// Integral numbers are printed without a fraction so that `5` reads
    /// back as `"5"` and not `"5.0"`.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Document::String(s) => Some(s.clone()),
            Document::Bool(b) => Some(b.to_string()),
            Document::Number(n) => Some(format_number(*n)),
            Document::Null | Document::Map(_) | Document::List(_) => None,
        }
    }

    /// Best-effort integer conversion of a scalar node
    pub fn to_int(&self) -> Option<i64> {
        match self {
            Document::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            Document::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().filter(|n| n.is_finite()).map(|n| n.trunc() as i64))
            }
            Document::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// String value of a property, or `default` when absent or not a scalar
    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.get(key)
            .and_then(Document::to_text)
            .unwrap_or_else(|| default.to_string())
    }

    /// Integer value of a property, or `default` when absent or not convertible
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(Document::to_int).unwrap_or(default)
    }

    /// Boolean value of a property using loose truthiness
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(Document::Bool(b)) => *b,
            Some(Document::Number(n)) => *n != 0.0 && !n.is_nan(),
            Some(Document::String(s)) => !s.is_empty(),
            Some(Document::Map(_)) | Some(Document::List(_)) => true,
            Some(Document::Null) | None => default,
        }
    }

    /// Scalar items of a list property, stringified in order.
    ///
    /// Non-scalar items are skipped; a missing or non-list property yields an
    /// empty list.
    pub fn get_string_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|list| list.items().filter_map(Document::to_text).collect())
            .unwrap_or_default()
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl From<serde_json::Value> for Document {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Document::Null,
            serde_json::Value::Bool(b) => Document::Bool(b),
            serde_json::Value::Number(n) => Document::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Document::String(s),
            serde_json::Value::Array(items) => {
                Document::List(items.into_iter().map(Document::from).collect())
            }
            serde_json::Value::Object(map) => Document::Map(
                map.into_iter().map(|(k, v)| (k, Document::from(v))).collect(),
            ),
        }
    }
}

impl From<&str> for Document {
    fn from(s: &str) -> Self {
        Document::String(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        Document::from(value)
    }

    #[test]
    fn test_get_string_defaults() {
        let d = doc(json!({ "name": "Danbooru", "n": 5, "flag": true, "nothing": null, "obj": {} }));

        assert_eq!(d.get_string("name", ""), "Danbooru");
        assert_eq!(d.get_string("n", ""), "5");
        assert_eq!(d.get_string("flag", ""), "true");
        assert_eq!(d.get_string("nothing", "def"), "def");
        assert_eq!(d.get_string("obj", "def"), "def");
        assert_eq!(d.get_string("missing", "def"), "def");
    }

    #[test]
    fn test_get_string_on_scalar_node() {
        let d = Document::from("text");
        assert_eq!(d.get_string("anything", "x"), "x");
    }

    #[test]
    fn test_get_int_coercion() {
        let d = doc(json!({
            "int": 5,
            "float": 7.9,
            "negative": -2.5,
            "str": " 12 ",
            "strfloat": "3.7",
            "bad": "abc",
            "yes": true,
            "list": [1]
        }));

        assert_eq!(d.get_int("int", 0), 5);
        assert_eq!(d.get_int("float", 0), 7);
        assert_eq!(d.get_int("negative", 0), -2);
        assert_eq!(d.get_int("str", 0), 12);
        assert_eq!(d.get_int("strfloat", 0), 3);
        assert_eq!(d.get_int("bad", 0), 0);
        assert_eq!(d.get_int("yes", 0), 1);
        assert_eq!(d.get_int("list", 0), 0);
        assert_eq!(d.get_int("missing", 42), 42);
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(Document::Number(1.5).to_text().as_deref(), Some("1.5"));
        assert_eq!(Document::Number(-3.0).to_text().as_deref(), Some("-3"));
        assert_eq!(Document::Null.to_text(), None);
    }

    #[test]
    fn test_string_list() {
        let d = doc(json!({ "tokens": ["a", 2, {"x": 1}, "b"], "single": "a" }));

        assert_eq!(d.get_string_list("tokens"), vec!["a", "2", "b"]);
        assert!(d.get_string_list("single").is_empty());
        assert!(d.get_string_list("missing").is_empty());
    }

    #[test]
    fn test_map_preserves_order() {
        let d = doc(json!({ "zeta": 1, "alpha": 2, "mid": 3 }));
        let keys: Vec<&str> = d.entries().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_entries_and_items_on_wrong_kind() {
        let d = Document::Bool(true);
        assert_eq!(d.entries().count(), 0);
        assert_eq!(d.items().count(), 0);
        assert_eq!(d.len(), 0);
        assert!(d.is_empty());
    }

    #[test]
    fn test_get_bool() {
        let d = doc(json!({ "t": true, "zero": 0, "s": "x", "empty": "" }));
        assert!(d.get_bool("t", false));
        assert!(!d.get_bool("zero", true));
        assert!(d.get_bool("s", false));
        assert!(!d.get_bool("empty", true));
        assert!(d.get_bool("missing", true));
    }
}
