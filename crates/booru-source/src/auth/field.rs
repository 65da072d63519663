//! Fields submitted as part of a login request.

use md5::Md5;
use serde::Serialize;

use crate::document::Document;

/// Digest used by [`HashField`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Md5,
    Sha1,
}

impl HashAlgorithm {
    /// Only the exact string `sha1` selects SHA-1, anything else is MD5
    pub fn from_name(name: &str) -> Self {
        match name {
            "sha1" => HashAlgorithm::Sha1,
            _ => HashAlgorithm::Md5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
        }
    }

    /// Lowercase hex digest of `data`
    pub fn hex_digest(&self, data: &[u8]) -> String {
        match self {
            HashAlgorithm::Sha1 => {
                use sha1::{Digest as Sha1Digest, Sha1};
                let mut hasher = Sha1::new();
                hasher.update(data);
                format!("{:x}", hasher.finalize())
            }
            HashAlgorithm::Md5 => {
                use md5::Digest;
                let mut hasher = Md5::new();
                hasher.update(data);
                format!("{:x}", hasher.finalize())
            }
        }
    }
}

/// A value typed in by the user (login, password, API key...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextField {
    /// Settings identifier the value is stored under
    pub id: String,
    /// Request parameter name
    pub key: String,
    pub is_password: bool,
    pub default: String,
}

impl TextField {
    /// The user-provided value, falling back to the declared default when
    /// nothing was entered
    pub fn value_or_default<'a>(&'a self, input: Option<&'a str>) -> &'a str {
        match input {
            Some(value) if !value.is_empty() => value,
            _ => &self.default,
        }
    }
}

/// A fixed value sent as-is
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstField {
    pub key: String,
    pub value: String,
}

/// A value derived from user input by hashing it with a salt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashField {
    pub key: String,
    pub algorithm: HashAlgorithm,
    /// Salt template; `%value%` is replaced by the user input
    pub salt: String,
}

impl HashField {
    pub const PLACEHOLDER: &'static str = "%value%";

    /// Compute the value to submit for the given user input
    pub fn compute(&self, input: &str) -> String {
        let salted = if self.salt.is_empty() {
            input.to_string()
        } else {
            self.salt.replace(Self::PLACEHOLDER, input)
        };
        self.algorithm.hex_digest(salted.as_bytes())
    }
}

/// One input of an authentication request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AuthField {
    Text(TextField),
    Const(ConstField),
    Hash(HashField),
}

impl AuthField {
    /// Build a field from its model description.
    ///
    /// Never fails: missing properties fall back to empty strings so that a
    /// single malformed field cannot prevent the rest of the source from
    /// loading.
    pub fn from_document(node: &Document) -> Self {
        let key = node.get_string("key", "");
        let field_type = node.get_string("type", "");

        match field_type.as_str() {
            "hash" => AuthField::Hash(HashField {
                key,
                algorithm: HashAlgorithm::from_name(&node.get_string("hash", "")),
                salt: node.get_string("salt", ""),
            }),
            "const" => AuthField::Const(ConstField {
                key,
                value: node.get_string("value", ""),
            }),
            _ => AuthField::Text(TextField {
                id: node.get_string("id", ""),
                key,
                is_password: field_type == "password",
                default: node.get_string("def", ""),
            }),
        }
    }

    /// Request parameter name
    pub fn key(&self) -> &str {
        match self {
            AuthField::Text(f) => &f.key,
            AuthField::Const(f) => &f.key,
            AuthField::Hash(f) => &f.key,
        }
    }

    /// Settings identifier, only user-editable fields have one
    pub fn id(&self) -> Option<&str> {
        match self {
            AuthField::Text(f) => Some(&f.id),
            _ => None,
        }
    }

    pub fn is_password(&self) -> bool {
        matches!(self, AuthField::Text(f) if f.is_password)
    }
}
