//! Personal-access-token authentication for Azure DevOps endpoints.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use reqwest::header::HeaderValue;

use crate::error::{DevOpsError, Result};

/// Builds the `Authorization` header value for a PAT: HTTP Basic with an empty user name.
pub fn basic_auth_value(pat: &str) -> Result<HeaderValue> {
    let token = BASE64_STANDARD.encode(format!(":{}", pat.trim()));
    let mut value = HeaderValue::from_str(&format!("Basic {}", token))
        .map_err(|err| DevOpsError::Configuration(err.to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}
