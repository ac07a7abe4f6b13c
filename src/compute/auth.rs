use std::process::Command;

use super::ComputeError;

/// Access token override, same variable the Google Terraform provider honours.
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// Resolves a bearer token: `GOOGLE_OAUTH_ACCESS_TOKEN`, else `gcloud auth print-access-token`.
pub fn resolve_access_token() -> Result<String, ComputeError> {
    if let Some(token) = std::env::var(ACCESS_TOKEN_ENV)
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
    {
        tracing::debug!("using access token from {}", ACCESS_TOKEN_ENV);
        return Ok(token);
    }

    gcloud(&["auth", "print-access-token"]).map_err(|message| ComputeError::Auth {
        message: format!(
            "{}. Set {} or run 'gcloud auth login' first",
            message, ACCESS_TOKEN_ENV
        ),
    })
}

/// Runs `gcloud <args>` and returns trimmed stdout; empty output is an error.
pub(crate) fn gcloud(args: &[&str]) -> Result<String, String> {
    let output = Command::new("gcloud")
        .args(args)
        .output()
        .map_err(|e| format!("gcloud CLI not found: {}", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!(
            "gcloud {} failed: {}",
            args.join(" "),
            stderr.trim()
        ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if stdout.is_empty() {
        return Err(format!("gcloud {} returned nothing", args.join(" ")));
    }
    Ok(stdout)
}
