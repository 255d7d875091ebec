mod jwt;

pub use jwt::AuthUser;
#[cfg(test)]
pub use jwt::JwtKeys;
