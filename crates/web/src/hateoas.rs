//! Response envelopes carrying the links a client can follow next.

use std::sync::Arc;

use axum::Json;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::middleware::base_url::BaseUrl;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Link {
    pub rel: String,
    /// Always absolute, so it can be printed into a QR code as is.
    pub href: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Response<T> {
    #[serde(flatten)]
    pub content: T,
    pub links: Vec<Link>,
}

impl<T> Response<T> {
    pub fn new(content: T) -> Self {
        Self {
            content,
            links: vec![],
        }
    }

    pub fn builder(content: T, base_url: Arc<BaseUrl>) -> ResponseBuilder<T> {
        ResponseBuilder {
            response: Self::new(content),
            base_url,
        }
    }

    pub fn json(self) -> Json<Self> {
        Json(self)
    }
}

pub struct ResponseBuilder<T> {
    response: Response<T>,
    base_url: Arc<BaseUrl>,
}

impl<T> ResponseBuilder<T> {
    /// Adds a link to `path` below the host the request reached us at.
    pub fn link<R, P>(mut self, rel: R, path: P) -> Self
    where
        R: Into<String>,
        P: Into<String>,
    {
        self.response.links.push(Link {
            rel: rel.into(),
            href: self.base_url.full_url(path),
        });
        self
    }

    /// Adds the front-end page that starts navigation at the location with
    /// this slug. This is the address encoded in the location's QR code.
    pub fn deep_link(self, slug: &str) -> Self {
        self.link("deepLink", format!("/navigate/{}", slug))
    }

    pub fn build(self) -> Response<T> {
        self.response
    }
}
