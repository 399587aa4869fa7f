//! Target URL resolution.
//!
//! # Responsibilities
//! - Derive the outbound target URL from one of three input encodings:
//!   `?url=`, `?b64url=`, or a path-embedded `/host/rest` form
//! - Default the scheme (`?scheme=`, else https) when the candidate has none
//! - Carry caller query parameters through to the target, minus the
//!   control parameters consumed here
//!
//! # Design Decisions
//! - Returns `Option`: an unresolvable target is a usage response, not a 4xx
//! - Malformed base64 and unparsable URLs fold into resolution failure
//! - The descriptor is built once per request and immutable thereafter

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use url::form_urlencoded;
use url::Url;

/// Query parameters consumed by the resolver; stripped from the final
/// target query so they are not leaked to the target.
const CONTROL_PARAMS: [&str; 3] = ["url", "b64url", "scheme"];

/// The resolved absolute URL a request is relayed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDescriptor {
    url: Url,
}

impl TargetDescriptor {
    /// The absolute target URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The full URL string, as sent on the wire.
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Host for the outbound `Host` header (no port when default).
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Authority (`host[:port]`) used to derive the storage container.
    pub fn authority(&self) -> String {
        match self.url.port() {
            Some(port) => format!("{}:{}", self.host(), port),
            None => self.host().to_string(),
        }
    }

    /// URL path, used to derive the storage object path.
    pub fn path(&self) -> &str {
        self.url.path()
    }
}

/// Resolve the outbound target from the inbound path and raw query string.
///
/// Returns `None` when no target can be derived; the caller should answer
/// with a usage page rather than an error.
pub fn resolve_target(path: &str, query: Option<&str>) -> Option<TargetDescriptor> {
    let pairs: Vec<(String, String)> = query
        .map(|q| {
            form_urlencoded::parse(q.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect()
        })
        .unwrap_or_default();

    let mut residual_path: Option<String> = None;
    let candidate = if let Some(url) = param(&pairs, "url").filter(|v| !v.is_empty()) {
        url.to_string()
    } else if let Some(b64) = param(&pairs, "b64url") {
        let decoded = BASE64.decode(b64).ok()?;
        String::from_utf8(decoded).ok()?
    } else if let Some((host, rest)) = split_path_form(path) {
        residual_path = rest;
        host
    } else {
        return None;
    };

    let candidate = if has_http_scheme(&candidate) {
        candidate
    } else {
        let scheme = param(&pairs, "scheme").unwrap_or("https");
        format!("{scheme}://{candidate}")
    };

    let mut target = Url::parse(&candidate).ok()?;
    if let Some(rest) = residual_path {
        target = target.join(&rest).ok()?;
    }

    if !pairs.is_empty() {
        let mut merged: Vec<(String, String)> = target
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        merged.extend(pairs);
        merged.retain(|(k, _)| !CONTROL_PARAMS.contains(&k.as_str()));

        if merged.is_empty() {
            target.set_query(None);
        } else {
            target.query_pairs_mut().clear().extend_pairs(merged);
        }
    }

    Some(TargetDescriptor { url: target })
}

fn param<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

/// Interpret the request path as `/host/rest...`, if it is neither empty,
/// the root, nor a favicon probe.
fn split_path_form(path: &str) -> Option<(String, Option<String>)> {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() || path == "/favicon.ico" {
        return None;
    }
    match trimmed.split_once('/') {
        Some((host, rest)) => {
            let rest = (!rest.is_empty()).then(|| rest.to_string());
            Some((host.to_string(), rest))
        }
        None => Some((trimmed.to_string(), None)),
    }
}

fn has_http_scheme(candidate: &str) -> bool {
    let lower = candidate
        .get(..8)
        .map(|p| p.to_ascii_lowercase())
        .unwrap_or_else(|| candidate.to_ascii_lowercase());
    lower.starts_with("http://") || lower.starts_with("https://")
}
