//! Credential providers and their collaborators
//!
//! - [`AppOnlyProvider`]: client-credentials grant
//! - [`UserDelegatedProvider`]: authorization-code grant with persisted tokens
//! - [`TokenEndpoint`]: the accounts-service token endpoint
//! - [`ConsoleCompleter`]: completes the user handshake from a terminal

pub mod app_only;
pub mod console;
pub mod token_endpoint;
pub mod user_delegated;

pub use app_only::AppOnlyProvider;
pub use console::ConsoleCompleter;
pub use token_endpoint::TokenEndpoint;
pub use user_delegated::UserDelegatedProvider;
