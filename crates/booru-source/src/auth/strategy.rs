use serde::Serialize;

use super::field::AuthField;
use crate::document::Document;

/// How a login attempt is verified after it has been performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckType {
    #[default]
    None,
    MaxPage,
    Cookie,
    Redirect,
}

impl CheckType {
    pub fn from_name(name: &str) -> Self {
        match name {
            "max_page" => CheckType::MaxPage,
            "cookie" => CheckType::Cookie,
            "redirect" => CheckType::Redirect,
            _ => CheckType::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckType::None => "",
            CheckType::MaxPage => "max_page",
            CheckType::Cookie => "cookie",
            CheckType::Redirect => "redirect",
        }
    }
}

/// The `check` sub-document of a scheme, when it is a map
fn check_node(node: &Document) -> Option<&Document> {
    node.get("check").filter(|check| check.is_map())
}

fn check_type(node: &Document) -> String {
    check_node(node)
        .map(|check| check.get_string("type", ""))
        .unwrap_or_default()
}

/// Page cap declared by a `max_page` check, 0 when there is none
fn max_page(node: &Document, check_type: &str) -> u32 {
    if check_type != "max_page" {
        return 0;
    }
    check_node(node)
        .map(|check| check.get_int("value", 0))
        .and_then(|value| u32::try_from(value).ok())
        .unwrap_or(0)
}

/// Build the field list of a scheme, in declaration order
fn fields(node: &Document) -> Vec<AuthField> {
    node.get("fields")
        .map(|fields| fields.items().map(AuthField::from_document).collect())
        .unwrap_or_default()
}

/// OAuth 2.0 login
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OAuth2Auth {
    pub auth_type: String,
    /// Grant flavor (`password`, `client_credentials`, `authorization_code`...)
    pub grant: String,
    pub token_url: String,
    pub authorization_url: String,
    pub redirect_url: String,
    pub url_protocol: String,
    pub request_url: String,
    pub scope: Vec<String>,
    /// Send client credentials in an `Authorization` header instead of the body
    pub header: bool,
    pub check_type: CheckType,
    pub max_page: u32,
}

impl OAuth2Auth {
    pub fn from_document(auth_type: &str, node: &Document) -> Self {
        let check = check_type(node);

        Self {
            auth_type: auth_type.to_string(),
            grant: node.get_string("authType", "password"),
            token_url: node.get_string("tokenUrl", ""),
            authorization_url: node.get_string("authorizationUrl", ""),
            redirect_url: node.get_string("redirectUrl", ""),
            url_protocol: node.get_string("urlProtocol", ""),
            request_url: node.get_string("requestUrl", ""),
            scope: node.get_string_list("scope"),
            header: node.get_bool("header", false),
            check_type: CheckType::from_name(&check),
            max_page: max_page(node, &check),
        }
    }
}

/// OAuth 1.0a login
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OAuth1Auth {
    pub auth_type: String,
    pub temporary_credential_url: String,
    pub authorization_url: String,
    pub token_credential_url: String,
    pub signature_method: String,
}

impl OAuth1Auth {
    pub fn from_document(auth_type: &str, node: &Document) -> Self {
        Self {
            auth_type: auth_type.to_string(),
            temporary_credential_url: node.get_string("temporaryCredentialUrl", ""),
            authorization_url: node.get_string("authorizationUrl", ""),
            token_credential_url: node.get_string("tokenCredentialUrl", ""),
            signature_method: node.get_string("signatureMethod", "hmac-sha1"),
        }
    }
}

/// HTTP basic authentication header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HttpBasicAuth {
    pub auth_type: String,
    /// 0 means unlimited
    pub max_page: u32,
    /// Which stored credential is sent as the password (`password`, `api_key`...)
    pub password_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
        }
    }
}

/// Form login against a dedicated endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HttpAuth {
    pub method: HttpMethod,
    /// Login endpoint
    pub url: String,
    pub fields: Vec<AuthField>,
    /// Cookie that must be set after a successful login
    pub cookie: String,
    /// Expected redirect target after a successful login
    pub redirect_url: String,
    /// Page to scrape CSRF values from before logging in
    pub csrf_url: String,
    /// Names of the values to scrape from `csrf_url` and resubmit
    pub csrf_fields: Vec<String>,
}

/// Credentials appended to every request URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlAuth {
    pub auth_type: String,
    pub fields: Vec<AuthField>,
    /// 0 means unlimited
    pub max_page: u32,
}

/// A compiled authentication scheme
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Auth {
    #[serde(rename = "oauth2")]
    OAuth2(OAuth2Auth),
    #[serde(rename = "oauth1")]
    OAuth1(OAuth1Auth),
    HttpBasic(HttpBasicAuth),
    Http(HttpAuth),
    Url(UrlAuth),
}

impl Auth {
    /// Compile one scheme description.
    ///
    /// Every `type` maps to a variant, with unknown or missing types falling
    /// back to [`UrlAuth`]. A description that is not a map has no `type`
    /// and compiles to a field-less [`UrlAuth`].
    pub fn from_document(node: &Document) -> Self {
        let auth_type = node.get_string("type", "");
        let check = check_type(node);

        match auth_type.as_str() {
            "oauth2" => Auth::OAuth2(OAuth2Auth::from_document(&auth_type, node)),
            "oauth1" => Auth::OAuth1(OAuth1Auth::from_document(&auth_type, node)),
            "http_basic" => Auth::HttpBasic(HttpBasicAuth {
                max_page: max_page(node, &check),
                password_type: node.get_string("passwordType", ""),
                auth_type: auth_type.clone(),
            }),
            "get" | "post" => {
                let method = HttpMethod::from_name(&auth_type).unwrap_or(HttpMethod::Get);
                let check_doc = check_node(node);
                let cookie = match (check.as_str(), check_doc) {
                    ("cookie", Some(c)) => c.get_string("key", ""),
                    _ => String::new(),
                };
                let redirect_url = match (check.as_str(), check_doc) {
                    ("redirect", Some(c)) => c.get_string("url", ""),
                    _ => String::new(),
                };
                let csrf = node.get("csrf").filter(|csrf| csrf.is_map());

                Auth::Http(HttpAuth {
                    method,
                    url: node.get_string("url", ""),
                    fields: fields(node),
                    cookie,
                    redirect_url,
                    csrf_url: csrf.map(|c| c.get_string("url", "")).unwrap_or_default(),
                    csrf_fields: csrf.map(|c| c.get_string_list("fields")).unwrap_or_default(),
                })
            }
            _ => Auth::Url(UrlAuth {
                fields: fields(node),
                max_page: max_page(node, &check),
                auth_type: auth_type.clone(),
            }),
        }
    }

    /// The raw `type` string the scheme was declared with
    pub fn auth_type(&self) -> &str {
        match self {
            Auth::OAuth2(a) => &a.auth_type,
            Auth::OAuth1(a) => &a.auth_type,
            Auth::HttpBasic(a) => &a.auth_type,
            Auth::Http(a) => a.method.as_str(),
            Auth::Url(a) => &a.auth_type,
        }
    }

    /// Fields owned by the scheme, in submission order
    pub fn fields(&self) -> &[AuthField] {
        match self {
            Auth::Http(a) => &a.fields,
            Auth::Url(a) => &a.fields,
            _ => &[],
        }
    }

    /// Page cap enforced by the scheme, if it declares one
    pub fn max_page(&self) -> Option<u32> {
        match self {
            Auth::OAuth2(a) => Some(a.max_page),
            Auth::HttpBasic(a) => Some(a.max_page),
            Auth::Url(a) => Some(a.max_page),
            Auth::OAuth1(_) | Auth::Http(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::field::{HashAlgorithm, HashField, TextField};
    use serde_json::json;

    fn auth(value: serde_json::Value) -> Auth {
        Auth::from_document(&Document::from(value))
    }

    #[test]
    fn test_http_get_with_cookie_check() {
        let a = auth(json!({
            "type": "get",
            "url": "https://x/login",
            "fields": [
                { "key": "user", "type": "text" },
                { "key": "pass", "type": "password" }
            ],
            "check": { "type": "cookie", "key": "session" }
        }));

        let Auth::Http(http) = a else { panic!("expected http auth") };
        assert_eq!(http.method, HttpMethod::Get);
        assert_eq!(http.url, "https://x/login");
        assert_eq!(http.cookie, "session");
        assert_eq!(http.redirect_url, "");
        assert_eq!(http.fields.len(), 2);
        assert_eq!(http.fields[0].key(), "user");
        assert!(!http.fields[0].is_password());
        assert_eq!(http.fields[1].key(), "pass");
        assert!(http.fields[1].is_password());
    }

    #[test]
    fn test_http_post_with_redirect_and_csrf() {
        let a = auth(json!({
            "type": "post",
            "url": "/session",
            "fields": [{ "id": "pseudo", "key": "name" }],
            "check": { "type": "redirect", "url": "/home", "key": "ignored" },
            "csrf": { "url": "/session/new", "fields": ["authenticity_token", "utf8"] }
        }));

        let Auth::Http(http) = a else { panic!("expected http auth") };
        assert_eq!(http.method, HttpMethod::Post);
        assert_eq!(http.cookie, "");
        assert_eq!(http.redirect_url, "/home");
        assert_eq!(http.csrf_url, "/session/new");
        assert_eq!(http.csrf_fields, vec!["authenticity_token", "utf8"]);
    }

    #[test]
    fn test_http_without_check_or_csrf() {
        let a = auth(json!({ "type": "post", "url": "/login", "csrf": "bogus" }));

        let Auth::Http(http) = a else { panic!("expected http auth") };
        assert!(http.fields.is_empty());
        assert_eq!(http.cookie, "");
        assert_eq!(http.csrf_url, "");
        assert!(http.csrf_fields.is_empty());
    }

    #[test]
    fn test_http_basic_max_page() {
        let a = auth(json!({
            "type": "http_basic",
            "passwordType": "plain",
            "check": { "type": "max_page", "value": 5 }
        }));

        assert_eq!(
            a,
            Auth::HttpBasic(HttpBasicAuth {
                auth_type: "http_basic".to_string(),
                max_page: 5,
                password_type: "plain".to_string(),
            })
        );
        assert_eq!(a.max_page(), Some(5));
    }

    #[test]
    fn test_max_page_ignored_for_other_checks() {
        let a = auth(json!({
            "type": "http_basic",
            "check": { "type": "cookie", "value": 5 }
        }));
        assert_eq!(a.max_page(), Some(0));
    }

    #[test]
    fn test_max_page_coercion() {
        let from_string = auth(json!({ "type": "url", "check": { "type": "max_page", "value": "10" } }));
        let garbage = auth(json!({ "type": "url", "check": { "type": "max_page", "value": "lots" } }));
        let negative = auth(json!({ "type": "url", "check": { "type": "max_page", "value": -3 } }));

        assert_eq!(from_string.max_page(), Some(10));
        assert_eq!(garbage.max_page(), Some(0));
        assert_eq!(negative.max_page(), Some(0));
    }

    #[test]
    fn test_url_fallback_keeps_field_order() {
        let a = auth(json!({
            "type": "url",
            "fields": [
                { "key": "login", "type": "text" },
                { "key": "password_hash", "type": "hash", "hash": "sha1", "salt": "s--%value%--" },
                { "key": "api", "type": "const", "value": "1" }
            ],
            "check": { "type": "max_page", "value": 1000 }
        }));

        let Auth::Url(url) = &a else { panic!("expected url auth") };
        assert_eq!(url.max_page, 1000);
        let keys: Vec<&str> = a.fields().iter().map(AuthField::key).collect();
        assert_eq!(keys, vec!["login", "password_hash", "api"]);
        assert_eq!(
            a.fields()[1],
            AuthField::Hash(HashField {
                key: "password_hash".to_string(),
                algorithm: HashAlgorithm::Sha1,
                salt: "s--%value%--".to_string(),
            })
        );
    }

    #[test]
    fn test_unknown_type_is_url() {
        for t in ["custom", "GET", "oauth3", ""] {
            let a = auth(json!({ "type": t, "fields": [{ "key": "k" }] }));
            assert!(matches!(a, Auth::Url(_)), "type {:?} should compile to url auth", t);
            assert_eq!(a.auth_type(), t);
        }
    }

    #[test]
    fn test_missing_type_is_empty_url() {
        let a = auth(json!({}));
        assert_eq!(
            a,
            Auth::Url(UrlAuth { auth_type: String::new(), fields: Vec::new(), max_page: 0 })
        );
    }

    #[test]
    fn test_non_map_scheme_is_empty_url() {
        let empty = Auth::Url(UrlAuth { auth_type: String::new(), fields: Vec::new(), max_page: 0 });

        assert_eq!(auth(json!("url")), empty);
        assert_eq!(auth(json!([1, 2])), empty);
        assert_eq!(Auth::from_document(&Document::Null), empty);
    }

    #[test]
    fn test_oauth2() {
        let a = auth(json!({
            "type": "oauth2",
            "authType": "client_credentials",
            "tokenUrl": "/oauth/token",
            "scope": ["read", "write"],
            "header": true,
            "check": { "type": "max_page", "value": 20 },
            "fields": [{ "key": "ignored" }]
        }));

        let Auth::OAuth2(oauth) = &a else { panic!("expected oauth2 auth") };
        assert_eq!(oauth.grant, "client_credentials");
        assert_eq!(oauth.token_url, "/oauth/token");
        assert_eq!(oauth.scope, vec!["read", "write"]);
        assert!(oauth.header);
        assert_eq!(oauth.check_type, CheckType::MaxPage);
        assert_eq!(oauth.max_page, 20);
        assert!(a.fields().is_empty());
    }

    #[test]
    fn test_oauth2_defaults() {
        let Auth::OAuth2(oauth) = auth(json!({ "type": "oauth2" })) else {
            panic!("expected oauth2 auth")
        };
        assert_eq!(oauth.grant, "password");
        assert_eq!(oauth.check_type, CheckType::None);
        assert!(!oauth.header);
    }

    #[test]
    fn test_oauth1() {
        let a = auth(json!({
            "type": "oauth1",
            "temporaryCredentialUrl": "/oauth/request_token",
            "authorizationUrl": "/oauth/authorize",
            "tokenCredentialUrl": "/oauth/access_token"
        }));

        let Auth::OAuth1(oauth) = &a else { panic!("expected oauth1 auth") };
        assert_eq!(oauth.temporary_credential_url, "/oauth/request_token");
        assert_eq!(oauth.signature_method, "hmac-sha1");
        assert_eq!(a.max_page(), None);
        assert_eq!(a.auth_type(), "oauth1");
    }

    #[test]
    fn test_text_fields_in_http_default_to_empty() {
        let a = auth(json!({ "type": "get", "fields": [{}] }));
        assert_eq!(
            a.fields(),
            &[AuthField::Text(TextField {
                id: String::new(),
                key: String::new(),
                is_password: false,
                default: String::new(),
            })]
        );
    }

    #[test]
    fn test_check_type_names() {
        for name in ["max_page", "cookie", "redirect"] {
            assert_eq!(CheckType::from_name(name).as_str(), name);
        }
        assert_eq!(CheckType::from_name("Cookie"), CheckType::None);
    }
}
