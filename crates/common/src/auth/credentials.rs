//! `Authorization` header values

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// `Basic base64(client_id:client_secret)`, sent to the token endpoint.
#[must_use]
pub fn basic_authorization(client_id: &str, client_secret: &str) -> String {
    let encoded = STANDARD.encode(format!("{client_id}:{client_secret}"));
    format!("Basic {encoded}")
}

/// `Bearer <token>`, sent with every API request.
#[must_use]
pub fn bearer_authorization(access_token: &str) -> String {
    format!("Bearer {access_token}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_header_encodes_id_and_secret() {
        // echo -n 'id:secret' | base64
        assert_eq!(basic_authorization("id", "secret"), "Basic aWQ6c2VjcmV0");
    }

    #[test]
    fn bearer_header_uses_token_verbatim() {
        assert_eq!(bearer_authorization("tok.en"), "Bearer tok.en");
    }
}
