//! Set-Cookie rewriting for cross-site session delivery.
//!
//! # Responsibilities
//! - Rewrite each upstream Set-Cookie directive independently
//! - Force `SameSite=None` and `Secure` when the deployment is cross-site
//! - Preserve every other attribute and the attribute order
//!
//! # Design Decisions
//! - One directive in, one directive out; the caller is responsible for
//!   emitting each rewritten directive as its own Set-Cookie header.
//!   Comma-joining headers corrupts `Expires` values, which contain commas.
//! - Rewriting is idempotent: a directive already carrying
//!   `SameSite=None; Secure` comes back with identical attributes.
//! - In development the directive is returned as issued; forcing `Secure`
//!   on plain-HTTP localhost would make the browser drop the session.

use crate::config::Environment;

/// How Set-Cookie directives are treated for the current deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookiePolicy {
    /// Force `SameSite=None; Secure` so cookies survive third-party cookie
    /// policy across origins.
    CrossSite,
    /// Leave cookies exactly as the upstream issued them.
    AsIssued,
}

impl CookiePolicy {
    /// Policy for a deployment environment.
    pub fn for_environment(environment: Environment) -> Self {
        if environment.is_production() {
            CookiePolicy::CrossSite
        } else {
            CookiePolicy::AsIssued
        }
    }
}

/// Rewrite a single Set-Cookie directive under the given policy.
///
/// The name=value pair and all attributes other than `SameSite` and `Secure`
/// pass through untouched, in their original order. `SameSite` values other
/// than `None` are replaced; missing `SameSite`/`Secure` are appended.
pub fn rewrite_set_cookie(directive: &str, policy: CookiePolicy) -> String {
    if policy == CookiePolicy::AsIssued {
        return directive.to_string();
    }

    let mut segments = Vec::new();
    let mut saw_same_site = false;
    let mut saw_secure = false;

    for (i, raw) in directive.split(';').enumerate() {
        let segment = raw.trim();
        if i == 0 {
            // name=value pair, never touched
            segments.push(segment.to_string());
            continue;
        }
        if segment.is_empty() {
            continue;
        }

        let (name, value) = match segment.split_once('=') {
            Some((n, v)) => (n.trim(), Some(v.trim())),
            None => (segment, None),
        };

        if name.eq_ignore_ascii_case("samesite") {
            saw_same_site = true;
            if value.is_some_and(|v| v.eq_ignore_ascii_case("none")) {
                segments.push(segment.to_string());
            } else {
                segments.push("SameSite=None".to_string());
            }
        } else {
            if name.eq_ignore_ascii_case("secure") {
                saw_secure = true;
            }
            segments.push(segment.to_string());
        }
    }

    if !saw_same_site {
        segments.push("SameSite=None".to_string());
    }
    if !saw_secure {
        segments.push("Secure".to_string());
    }

    segments.join("; ")
}
