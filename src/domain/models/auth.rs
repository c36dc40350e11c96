use serde::{Deserialize, Serialize};

/// Access-token claims issued by the external auth provider. This
/// service only verifies; it never issues tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub aud: String,
    pub exp: usize,
}
