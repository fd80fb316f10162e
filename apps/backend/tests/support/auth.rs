//! Bearer token helpers for tests

use std::time::{Duration, SystemTime};

use catalog_api::{mint_access_token, SecurityConfig};

/// `Authorization` header value for `user_id`, signed with the test secret.
pub fn bearer(user_id: i64) -> String {
    let token = mint_access_token(user_id, SystemTime::now(), &SecurityConfig::default())
        .expect("should mint token successfully");
    format!("Bearer {token}")
}

/// A correctly signed token whose lifetime ended an hour ago.
pub fn expired_bearer(user_id: i64) -> String {
    let issued = SystemTime::now() - Duration::from_secs(2 * 60 * 60);
    let token = mint_access_token(user_id, issued, &SecurityConfig::default())
        .expect("should mint token successfully");
    format!("Bearer {token}")
}

/// A token signed with a secret the server does not know.
pub fn foreign_bearer(user_id: i64) -> String {
    let other = SecurityConfig::new(b"some-other-secret".to_vec());
    let token = mint_access_token(user_id, SystemTime::now(), &other)
        .expect("should mint token successfully");
    format!("Bearer {token}")
}
