use serde::Serialize;

use crate::document::Document;

/// Letter case applied to tag names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseFormat {
    /// `tag name`
    #[default]
    Lower,
    /// `Tag name`
    UpperFirst,
    /// `Tag Name`
    Upper,
    /// `TAG NAME`
    Caps,
}

impl CaseFormat {
    /// Exact lookup, unknown names fall back to [`CaseFormat::Lower`]
    pub fn from_name(name: &str) -> Self {
        match name {
            "upper_first" => CaseFormat::UpperFirst,
            "upper" => CaseFormat::Upper,
            "caps" => CaseFormat::Caps,
            _ => CaseFormat::Lower,
        }
    }

    fn apply(&self, word: &str, index: usize) -> String {
        match self {
            CaseFormat::Lower => word.to_lowercase(),
            CaseFormat::UpperFirst if index == 0 => capitalize(word),
            CaseFormat::UpperFirst => word.to_lowercase(),
            CaseFormat::Upper => capitalize(word),
            CaseFormat::Caps => word.to_uppercase(),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// How a source expects tag names to be written
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TagNameFormat {
    pub case_format: CaseFormat,
    pub word_separator: String,
}

impl TagNameFormat {
    pub fn new(case_format: CaseFormat, word_separator: impl Into<String>) -> Self {
        Self {
            case_format,
            word_separator: word_separator.into(),
        }
    }

    /// Read a model's `tagFormat` node
    pub fn from_document(node: &Document) -> Self {
        Self::new(
            CaseFormat::from_name(&node.get_string("case", "")),
            node.get_string("wordSeparator", ""),
        )
    }

    /// Rewrite a tag name into the source's format
    pub fn format(&self, tag: &str) -> String {
        tag.split(|c: char| c == ' ' || c == '_')
            .filter(|word| !word.is_empty())
            .enumerate()
            .map(|(i, word)| self.case_format.apply(word, i))
            .collect::<Vec<_>>()
            .join(&self.word_separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_case_lookup() {
        assert_eq!(CaseFormat::from_name("lower"), CaseFormat::Lower);
        assert_eq!(CaseFormat::from_name("upper_first"), CaseFormat::UpperFirst);
        assert_eq!(CaseFormat::from_name("upper"), CaseFormat::Upper);
        assert_eq!(CaseFormat::from_name("caps"), CaseFormat::Caps);
        assert_eq!(CaseFormat::from_name("CAPS"), CaseFormat::Lower);
        assert_eq!(CaseFormat::from_name(""), CaseFormat::Lower);
    }

    #[test]
    fn test_default() {
        let format = TagNameFormat::default();
        assert_eq!(format.case_format, CaseFormat::Lower);
        assert_eq!(format.word_separator, "");
    }

    #[test]
    fn test_from_document() {
        let node = Document::from(json!({ "case": "upper", "wordSeparator": "_" }));
        assert_eq!(TagNameFormat::from_document(&node), TagNameFormat::new(CaseFormat::Upper, "_"));

        let partial = Document::from(json!({ "case": "unknown" }));
        assert_eq!(TagNameFormat::from_document(&partial), TagNameFormat::default());
    }

    #[test]
    fn test_format() {
        let tag = "hatsune_MIKU long hair";
        assert_eq!(TagNameFormat::new(CaseFormat::Lower, "_").format(tag), "hatsune_miku_long_hair");
        assert_eq!(TagNameFormat::new(CaseFormat::UpperFirst, " ").format(tag), "Hatsune miku long hair");
        assert_eq!(TagNameFormat::new(CaseFormat::Upper, " ").format(tag), "Hatsune Miku Long Hair");
        assert_eq!(TagNameFormat::new(CaseFormat::Caps, "-").format(tag), "HATSUNE-MIKU-LONG-HAIR");
    }
}
