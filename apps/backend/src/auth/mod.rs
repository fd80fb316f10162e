pub mod guard;
pub mod jwt;
pub mod password;

pub use guard::{Authenticate, RequireAdmin};
pub use jwt::{mint_access_token, verify_access_token, Claims};
