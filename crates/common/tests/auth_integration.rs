//! Integration tests for the OAuth helpers
//!
//! Walks the authorization-code handshake from URL construction to token
//! bookkeeping without any network.

use tunewire_common::{
    basic_authorization, parse_authorization_response, AuthorizationRequest,
    AuthorizationResponseError, GrantType, TokenResponse, TokenSet,
};
use url::Url;

#[test]
fn authorize_url_round_trips_through_the_redirect() {
    let url = AuthorizationRequest::new(
        "https://accounts.spotify.com/authorize",
        "client-123",
        "http://localhost:8888/callback",
    )
    .with_scopes(["user-read-private", "playlist-read-private"])
    .with_state("xyz")
    .to_url()
    .expect("authorize URL should build");

    let parsed = Url::parse(&url).expect("authorize URL should parse");
    let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
    assert!(pairs.contains(&("scope".into(), "user-read-private playlist-read-private".into())));
    assert!(pairs.contains(&("redirect_uri".into(), "http://localhost:8888/callback".into())));

    let redirect = "http://localhost:8888/callback?code=AQBx-42&state=xyz";
    assert_eq!(parse_authorization_response(redirect), Ok("AQBx-42".to_string()));
}

#[test]
fn denied_redirect_is_reported() {
    let redirect = "http://localhost:8888/callback?error=access_denied&state=xyz";

    assert_eq!(
        parse_authorization_response(redirect),
        Err(AuthorizationResponseError::Denied("access_denied".into()))
    );
}

#[test]
fn refresh_response_keeps_the_previous_refresh_token() {
    let first: TokenSet = serde_json::from_str::<TokenResponse>(
        r#"{"access_token":"a1","token_type":"Bearer","expires_in":3600,"refresh_token":"r1"}"#,
    )
    .expect("token response should parse")
    .into();
    let renewed: TokenSet = serde_json::from_str::<TokenResponse>(
        r#"{"access_token":"a2","token_type":"Bearer","expires_in":3600}"#,
    )
    .expect("token response should parse")
    .into();

    let renewed = renewed.inherit_refresh_token(&first);

    assert_eq!(renewed.access_token, "a2");
    assert_eq!(renewed.refresh_token.as_deref(), Some("r1"));
    assert!(!renewed.is_expired(60));
}

#[test]
fn token_request_headers_and_forms() {
    assert_eq!(basic_authorization("id", "secret"), "Basic aWQ6c2VjcmV0");
    assert_eq!(
        GrantType::refresh_token_form("r1"),
        vec![("grant_type", "refresh_token".to_string()), ("refresh_token", "r1".to_string())]
    );
}
