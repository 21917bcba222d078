//! OAuth building blocks
//!
//! Pure helpers for talking to the accounts service. The HTTP exchange itself
//! lives in `tunewire-infra`; everything here is side-effect free.

pub mod authorize;
pub mod credentials;
pub mod grant;
pub mod types;

pub use authorize::{parse_authorization_response, AuthorizationRequest, AuthorizationResponseError};
pub use credentials::{basic_authorization, bearer_authorization};
pub use grant::GrantType;
pub use types::{expiry_after, OAuthErrorBody, TokenResponse, TokenSet};
