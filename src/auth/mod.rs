/// Authentication module
///
/// Password hashing, access-token issuance/validation, refresh-token
/// lifecycle, bearer extraction, and the ownership guard.

mod bearer;
mod claims;
mod guard;
mod jwt;
mod password;
mod refresh_token;

pub use bearer::bearer_token;
pub use claims::Claims;
pub use claims::TOKEN_ISSUER;
pub use guard::authorize;
pub use jwt::generate_access_token;
pub use jwt::validate_access_token;
pub use password::hash_password;
pub use password::verify_password;
pub use refresh_token::generate_refresh_token;
pub use refresh_token::resolve_refresh_token;
pub use refresh_token::revoke_refresh_token;
pub use refresh_token::save_refresh_token;
