// handlers/public/auth/mod.rs - Account and session endpoints under /api/auth

use serde::Deserialize;

pub mod login;    // POST /api/auth/login - exchange credentials for a session token
pub mod register; // POST /api/auth/register - create a new account
pub mod session;  // GET /api/auth/session - describe the current session

pub use login::login_post;
pub use register::register_post;
pub use session::session_get;

/// Treats a missing, null or empty value as absent.
fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

/// Body shared by register and login; every field is optional so missing
/// fields surface as a validation error rather than a JSON rejection.
#[derive(Debug, Default, Deserialize)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

impl Credentials {
    /// Names of `required` fields that are absent, in the given order.
    pub fn missing<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|field| {
                let value = match *field {
                    "email" => &self.email,
                    "password" => &self.password,
                    "name" => &self.name,
                    _ => return false,
                };
                !present(value)
            })
            .collect()
    }
}
