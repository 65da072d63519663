use std::collections::BTreeMap;

use serde::Serialize;

use super::api::Api;
use super::tag_format::TagNameFormat;
use crate::auth::Auth;
use crate::document::Document;

/// Everything a source model declares
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SourceDefinition {
    pub name: String,
    pub additional_tokens: Vec<String>,
    pub apis: Vec<Api>,
    pub tag_name_format: TagNameFormat,
    /// Authentication schemes by id
    pub auths: BTreeMap<String, Auth>,
}

impl SourceDefinition {
    /// Compile an evaluated model.
    ///
    /// Malformed parts degrade to defaults; a malformed scheme compiles to a
    /// field-less url scheme without affecting the others.
    pub fn from_document(doc: &Document) -> Self {
        let name = doc.get_string("name", "");
        let additional_tokens = doc.get_string_list("tokens");

        let apis = doc
            .get("apis")
            .map(|apis| {
                apis.entries()
                    .map(|(id, definition)| Api::new(id.as_str(), definition.clone()))
                    .collect()
            })
            .unwrap_or_default();

        let tag_name_format = doc
            .get("tagFormat")
            .filter(|node| !node.is_null())
            .map(TagNameFormat::from_document)
            .unwrap_or_default();

        let mut auths = BTreeMap::new();
        if let Some(schemes) = doc.get("auth") {
            for (id, node) in schemes.entries() {
                if !node.is_map() {
                    log::debug!("Auth scheme '{}' in {} is not a map", id, name);
                }
                auths.entry(id.clone()).or_insert_with(|| Auth::from_document(node));
            }
        }

        Self {
            name,
            additional_tokens,
            apis,
            tag_name_format,
            auths,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthField, HttpMethod};
    use crate::source::tag_format::CaseFormat;
    use serde_json::json;

    fn compile(value: serde_json::Value) -> SourceDefinition {
        SourceDefinition::from_document(&Document::from(value))
    }

    #[test]
    fn test_full_model() {
        let def = compile(json!({
            "name": "Danbooru (2.0)",
            "tokens": ["score", "favorited"],
            "tagFormat": { "case": "lower", "wordSeparator": "_" },
            "auth": {
                "url": {
                    "type": "url",
                    "fields": [{ "key": "login" }, { "key": "api_key", "type": "password" }]
                },
                "session": {
                    "type": "post",
                    "url": "/session",
                    "fields": [{ "key": "name" }],
                    "check": { "type": "cookie", "key": "_danbooru2_session" }
                }
            },
            "apis": {
                "json": { "name": "JSON", "auth": [] },
                "html": { "name": "Regex" }
            }
        }));

        assert_eq!(def.name, "Danbooru (2.0)");
        assert_eq!(def.additional_tokens, vec!["score", "favorited"]);
        assert_eq!(def.tag_name_format, TagNameFormat::new(CaseFormat::Lower, "_"));

        let apis: Vec<&str> = def.apis.iter().map(Api::name).collect();
        assert_eq!(apis, vec!["json", "html"]);
        assert_eq!(def.apis[0].definition().get_string("name", ""), "JSON");

        assert_eq!(def.auths.len(), 2);
        match &def.auths["session"] {
            Auth::Http(http) => {
                assert_eq!(http.method, HttpMethod::Post);
                assert_eq!(http.cookie, "_danbooru2_session");
            }
            other => panic!("unexpected auth {:?}", other),
        }
        let url_fields = def.auths["url"].fields();
        assert_eq!(url_fields.len(), 2);
        assert!(matches!(&url_fields[1], AuthField::Text(f) if f.is_password));
    }

    #[test]
    fn test_empty_model() {
        let def = compile(json!({}));
        assert_eq!(def, SourceDefinition::default());
    }

    #[test]
    fn test_model_without_apis() {
        let def = compile(json!({ "name": "Empty", "apis": {} }));
        assert_eq!(def.name, "Empty");
        assert!(def.apis.is_empty());
        assert!(def.auths.is_empty());
    }

    #[test]
    fn test_malformed_schemes_fall_back_to_url() {
        let def = compile(json!({
            "auth": {
                "broken": "not a map",
                "nothing": null,
                "good": { "type": "http_basic", "passwordType": "apiKey" }
            }
        }));

        assert_eq!(def.auths.keys().collect::<Vec<_>>(), vec!["broken", "good", "nothing"]);
        for id in ["broken", "nothing"] {
            match &def.auths[id] {
                Auth::Url(url) => {
                    assert!(url.fields.is_empty());
                    assert_eq!(url.max_page, 0);
                }
                other => panic!("unexpected auth {:?}", other),
            }
        }
        assert!(matches!(def.auths["good"], Auth::HttpBasic(_)));
    }

    #[test]
    fn test_auth_not_a_map() {
        let def = compile(json!({ "auth": ["url"], "apis": "json" }));
        assert!(def.auths.is_empty());
        assert!(def.apis.is_empty());
    }

    #[test]
    fn test_null_tag_format_is_default() {
        let def = compile(json!({ "tagFormat": null }));
        assert_eq!(def.tag_name_format, TagNameFormat::default());

        let def = compile(json!({ "tagFormat": { "case": "caps" } }));
        assert_eq!(def.tag_name_format, TagNameFormat::new(CaseFormat::Caps, ""));
    }
}
