//! Viewer-request redirect function.
//!
//! The alias distribution in the split topology attaches this function to
//! every viewer request: requests for the alias hostname are answered with a
//! permanent redirect to the primary hostname, preserving path and query;
//! everything else passes through untouched. The declaration carries only
//! the two hostnames — the evaluator below is the function's behavior, and
//! is what the tests exercise.
//!
//! A broken or confused request (no Host header, unparseable target) must
//! never block the alias hostname's fallback content, so the evaluator's
//! only failure mode is pass-through.

use serde::{Deserialize, Serialize};
use url::Url;

/// Declaration of the viewer-request redirect function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerFunctionDeclaration {
    /// Hostname whose requests are redirected
    pub alias_hostname: String,
    /// Redirect target hostname
    pub primary_hostname: String,
}

impl ViewerFunctionDeclaration {
    /// Redirect requests for `alias` to `primary`.
    pub fn redirect(alias: impl Into<String>, primary: impl Into<String>) -> Self {
        Self {
            alias_hostname: alias.into(),
            primary_hostname: primary.into(),
        }
    }

    /// Evaluate the function against one viewer request.
    ///
    /// Returns a 301 to `https://<primary><path>?<query>` when the request's
    /// Host equals the alias hostname; otherwise forwards the request
    /// unmodified. Host comparison is case-insensitive, as header values
    /// are.
    pub fn evaluate(&self, request: ViewerRequest) -> ViewerOutcome {
        let is_alias = request
            .host
            .as_deref()
            .is_some_and(|h| h.eq_ignore_ascii_case(&self.alias_hostname));
        if !is_alias {
            return ViewerOutcome::Forward(request);
        }

        let mut target = match Url::parse(&format!("https://{}", self.primary_hostname)) {
            Ok(url) => url,
            Err(_) => return ViewerOutcome::Forward(request),
        };
        target.set_path(&request.uri);
        match request.query.as_deref() {
            Some(query) if !query.is_empty() => target.set_query(Some(query)),
            _ => target.set_query(None),
        }

        ViewerOutcome::Redirect {
            status: 301,
            location: target.to_string(),
        }
    }
}

/// The parts of a viewer request the function inspects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerRequest {
    /// Host header, if the viewer sent one
    pub host: Option<String>,
    /// Request path, leading slash included
    pub uri: String,
    /// Raw query string, without the leading `?`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl ViewerRequest {
    /// A request for the given host and path.
    pub fn new(host: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            uri: uri.into(),
            query: None,
        }
    }

    /// Attach a query string.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }
}

/// What the function does with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerOutcome {
    /// Pass the request through unchanged
    Forward(ViewerRequest),
    /// Answer with a redirect instead of contacting the origin
    Redirect {
        /// HTTP status code
        status: u16,
        /// Redirect target
        location: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function() -> ViewerFunctionDeclaration {
        ViewerFunctionDeclaration::redirect("www.example.com", "example.com")
    }

    #[test]
    fn alias_host_redirects_with_path_and_query() {
        let outcome = function().evaluate(ViewerRequest::new("www.example.com", "/a").with_query("b=1"));
        assert_eq!(
            outcome,
            ViewerOutcome::Redirect {
                status: 301,
                location: "https://example.com/a?b=1".to_string(),
            }
        );
    }

    #[test]
    fn host_comparison_is_case_insensitive() {
        let outcome = function().evaluate(ViewerRequest::new("WWW.Example.COM", "/"));
        assert!(matches!(outcome, ViewerOutcome::Redirect { status: 301, .. }));
    }

    #[test]
    fn other_hosts_pass_through() {
        let request = ViewerRequest::new("example.com", "/a").with_query("b=1");
        let outcome = function().evaluate(request.clone());
        assert_eq!(outcome, ViewerOutcome::Forward(request));
    }

    #[test]
    fn missing_host_passes_through() {
        let request = ViewerRequest {
            host: None,
            uri: "/a".to_string(),
            query: None,
        };
        let outcome = function().evaluate(request.clone());
        assert_eq!(outcome, ViewerOutcome::Forward(request));
    }

    #[test]
    fn empty_query_is_dropped() {
        let outcome = function().evaluate(ViewerRequest::new("www.example.com", "/a").with_query(""));
        assert_eq!(
            outcome,
            ViewerOutcome::Redirect {
                status: 301,
                location: "https://example.com/a".to_string(),
            }
        );
    }
}
