use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use navigation::{admin::AdminCapability, database::Database};
use tower_cookies::{Cookie, Cookies};
use uuid::Uuid;

use crate::{common::RouteErrorResponse, WebState};

pub const SESSION_COOKIE: &str = "admin_session";

/// Logged in admin sessions, keyed by the token stored in their cookie.
/// Sessions live as long as the process.
#[derive(Debug, Clone, Default)]
pub struct Sessions {
    inner: Arc<RwLock<HashMap<Uuid, AdminCapability>>>,
}

impl Sessions {
    pub fn open(&self, capability: AdminCapability) -> Uuid {
        let token = Uuid::new_v4();
        self.inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(token, capability);
        token
    }

    pub fn get(&self, token: &Uuid) -> Option<AdminCapability> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(token)
            .cloned()
    }

    pub fn close(&self, token: &Uuid) -> bool {
        self.inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(token)
            .is_some()
    }
}

pub fn session_cookie(token: Uuid) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .build()
}

pub fn session_token(cookies: &Cookies) -> Option<Uuid> {
    cookies
        .get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

/// Extracts the capability of the admin session the request belongs to and
/// rejects the request with 401 if there is none.
pub struct AdminSession(pub AdminCapability);

#[async_trait]
impl<D> FromRequestParts<WebState<D>> for AdminSession
where
    D: Database,
{
    type Rejection = RouteErrorResponse;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &WebState<D>,
    ) -> Result<Self, Self::Rejection> {
        let cookies = Cookies::from_request_parts(parts, state)
            .await
            .map_err(|(status, message)| RouteErrorResponse::new(status).with_message(message))?;

        session_token(&cookies)
            .and_then(|token| state.sessions.get(&token))
            .map(AdminSession)
            .ok_or_else(|| {
                RouteErrorResponse::new(StatusCode::UNAUTHORIZED)
                    .with_method(&parts.method)
                    .with_uri(parts.uri.path())
                    .with_message("Please log in as admin first.")
            })
    }
}
