//! Authentication schemes declared by source models
//!
//! A model's `auth` map associates a scheme id with a description. Each
//! description is compiled into one [`Auth`] variant, chosen by its `type`:
//!
//! | `type`                | Variant          |
//! |-----------------------|------------------|
//! | `oauth2`              | [`OAuth2Auth`]   |
//! | `oauth1`              | [`OAuth1Auth`]   |
//! | `http_basic`          | [`HttpBasicAuth`]|
//! | `get`, `post`         | [`HttpAuth`]     |
//! | anything else         | [`UrlAuth`]      |
//!
//! # Model format
//!
//! ```json
//! {
//!     "session": {
//!         "type": "post",
//!         "url": "/session",
//!         "fields": [
//!             { "id": "pseudo", "key": "name" },
//!             { "id": "password", "key": "password", "type": "password" }
//!         ],
//!         "check": { "type": "cookie", "key": "_session" },
//!         "csrf": { "url": "/session/new", "fields": ["authenticity_token"] }
//!     },
//!     "url": {
//!         "type": "url",
//!         "fields": [
//!             { "key": "login" },
//!             { "key": "password_hash", "type": "hash", "hash": "sha1", "salt": "salt--%value%--" }
//!         ],
//!         "check": { "type": "max_page", "value": 1000 }
//!     }
//! }
//! ```
//!
//! Compilation only produces the plan; performing the login is left to the
//! HTTP layer.

mod field;
mod strategy;

pub use field::{AuthField, ConstField, HashAlgorithm, HashField, TextField};
pub use strategy::{
    Auth, CheckType, HttpAuth, HttpBasicAuth, HttpMethod, OAuth1Auth, OAuth2Auth, UrlAuth,
};
