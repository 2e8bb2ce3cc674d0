mod crypto;
mod extractor;
mod session;

pub use crypto::{hash_password, verify_password, PasswordError};
pub use extractor::{AuthError, AuthUser};
pub use session::{create_session, user_from_token, SessionError};
