//! OAuth grant types and their form bodies

use tunewire_domain::impl_wire_name_conversions;

/// OAuth 2.0 grants used against the accounts service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrantType {
    /// App-only access, no user context
    ClientCredentials,
    /// Exchange of a user-approved authorization code
    AuthorizationCode,
    /// Renewal of a user-delegated token
    RefreshToken,
}

impl_wire_name_conversions!(GrantType {
    ClientCredentials => "client_credentials",
    AuthorizationCode => "authorization_code",
    RefreshToken => "refresh_token",
});

impl GrantType {
    /// Build the `application/x-www-form-urlencoded` fields for a client-credentials
    /// request.
    #[must_use]
    pub fn client_credentials_form() -> Vec<(&'static str, String)> {
        vec![("grant_type", Self::ClientCredentials.as_str().to_string())]
    }

    /// Form fields for exchanging `code` issued to `redirect_uri`.
    #[must_use]
    pub fn authorization_code_form(code: &str, redirect_uri: &str) -> Vec<(&'static str, String)> {
        vec![
            ("grant_type", Self::AuthorizationCode.as_str().to_string()),
            ("code", code.to_string()),
            ("redirect_uri", redirect_uri.to_string()),
        ]
    }

    /// Form fields for renewing with `refresh_token`.
    #[must_use]
    pub fn refresh_token_form(refresh_token: &str) -> Vec<(&'static str, String)> {
        vec![
            ("grant_type", Self::RefreshToken.as_str().to_string()),
            ("refresh_token", refresh_token.to_string()),
        ]
    }
}
