pub mod resolver;
pub mod valkey;

pub use resolver::{SessionError, SessionResolver, SessionVerifier};
pub use valkey::ValkeySessionResolver;
