//! Browser-side session: the bearer token and the username decoded from it.
//!
//! The token is persisted in `localStorage` under [`TOKEN_STORAGE_KEY`] so a
//! reload keeps the user signed in. The username is read from the token
//! payload without verifying the signature; the server stays the authority.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use yew::prelude::*;

pub const TOKEN_STORAGE_KEY: &str = "auth_token";

/// Current authentication state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    token: Option<String>,
    username: Option<String>,
}

impl Session {
    pub fn from_token(token: Option<String>) -> Self {
        let token = token.filter(|t| !t.trim().is_empty());
        let username = token.as_deref().and_then(decode_username);
        Self { token, username }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Extract the `username` claim from a JWT payload.
pub fn decode_username(token: &str) -> Option<String> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    claims
        .get("username")
        .and_then(|value| value.as_str())
        .map(str::to_string)
}

fn load_token() -> Option<String> {
    let storage = web_sys::window()?.local_storage().ok()??;
    storage.get_item(TOKEN_STORAGE_KEY).ok()?
}

fn store_token(token: Option<&str>) {
    let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) else {
        log::warn!("localStorage unavailable, session will not survive a reload");
        return;
    };
    let result = match token {
        Some(token) => storage.set_item(TOKEN_STORAGE_KEY, token),
        None => storage.remove_item(TOKEN_STORAGE_KEY),
    };
    if let Err(e) = result {
        log::error!("Failed to persist session token: {:?}", e);
    }
}

/// Session handle shared through context
#[derive(Clone, PartialEq)]
pub struct SessionContext {
    pub session: Session,
    set_token: Callback<Option<String>>,
}

impl SessionContext {
    pub fn token(&self) -> Option<&str> {
        self.session.token()
    }

    pub fn username(&self) -> Option<&str> {
        self.session.username()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn set_token(&self, token: String) {
        self.set_token.emit(Some(token));
    }

    pub fn logout(&self) {
        self.set_token.emit(None);
    }
}

#[derive(Properties, PartialEq)]
pub struct SessionProviderProps {
    pub children: Children,
}

#[function_component(SessionProvider)]
pub fn session_provider(props: &SessionProviderProps) -> Html {
    let session = use_state(|| Session::from_token(load_token()));

    let set_token = {
        let session = session.clone();
        Callback::from(move |token: Option<String>| {
            store_token(token.as_deref());
            let next = Session::from_token(token);
            match next.username() {
                Some(username) => log::info!("Signed in as {}", username),
                None if next.is_authenticated() => log::warn!("Signed in with an unreadable token"),
                None => log::info!("Signed out"),
            }
            session.set(next);
        })
    };

    let context = SessionContext {
        session: (*session).clone(),
        set_token,
    };

    html! {
        <ContextProvider<SessionContext> context={context}>
            { props.children.clone() }
        </ContextProvider<SessionContext>>
    }
}

/// Access the session; outside a provider this is an anonymous session
#[hook]
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().unwrap_or_else(|| {
        log::warn!("use_session called outside SessionProvider");
        SessionContext {
            session: Session::default(),
            set_token: Callback::noop(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with_payload(payload: &str) -> String {
        format!(
            "eyJhbGciOiJIUzI1NiJ9.{}.c2lnbmF0dXJl",
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn test_decode_username() {
        let token = token_with_payload(r#"{"sub":1,"username":"ana","iat":0,"exp":3600}"#);
        assert_eq!(decode_username(&token), Some("ana".to_string()));
    }

    #[test]
    fn test_decode_username_handles_non_ascii() {
        let token = token_with_payload(r#"{"sub":2,"username":"josé"}"#);
        assert_eq!(decode_username(&token), Some("josé".to_string()));
    }

    #[test]
    fn test_decode_username_rejects_garbage() {
        assert_eq!(decode_username("not-a-token"), None);
        assert_eq!(decode_username("a.!!!.c"), None);
        assert_eq!(decode_username(&token_with_payload("not json")), None);
        assert_eq!(decode_username(&token_with_payload(r#"{"sub":1}"#)), None);
    }

    #[test]
    fn test_session_from_token() {
        let token = token_with_payload(r#"{"username":"ana"}"#);
        let session = Session::from_token(Some(token.clone()));
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some(token.as_str()));
        assert_eq!(session.username(), Some("ana"));

        assert!(!Session::from_token(None).is_authenticated());
        assert!(!Session::from_token(Some("  ".to_string())).is_authenticated());
    }
}
