//! Redirect function behavior: the alias distribution's only job.

use pretty_assertions::assert_eq;

use sitestack::resources::function::{ViewerFunctionDeclaration, ViewerOutcome, ViewerRequest};

fn function() -> ViewerFunctionDeclaration {
    ViewerFunctionDeclaration::redirect("www.example.com", "example.com")
}

#[test]
fn alias_request_redirects_to_primary_with_path_and_query() {
    let request = ViewerRequest::new("www.example.com", "/a").with_query("b=1");
    assert_eq!(
        function().evaluate(request),
        ViewerOutcome::Redirect {
            status: 301,
            location: "https://example.com/a?b=1".to_string(),
        }
    );
}

#[test]
fn non_alias_host_passes_through_unmodified() {
    let requests = [
        ViewerRequest::new("example.com", "/a").with_query("b=1"),
        ViewerRequest::new("other.example.com", "/"),
        ViewerRequest::new("d1234abcd.cloudfront.net", "/index.html"),
    ];
    for request in requests {
        assert_eq!(
            function().evaluate(request.clone()),
            ViewerOutcome::Forward(request)
        );
    }
}

#[test]
fn request_without_host_header_passes_through() {
    let request = ViewerRequest {
        host: None,
        uri: "/a".to_string(),
        query: Some("b=1".to_string()),
    };
    assert_eq!(
        function().evaluate(request.clone()),
        ViewerOutcome::Forward(request)
    );
}

#[test]
fn deep_paths_and_queries_are_preserved() {
    let request =
        ViewerRequest::new("www.example.com", "/blog/2024/post.html").with_query("utm=x&ref=y");
    assert_eq!(
        function().evaluate(request),
        ViewerOutcome::Redirect {
            status: 301,
            location: "https://example.com/blog/2024/post.html?utm=x&ref=y".to_string(),
        }
    );
}

#[test]
fn root_path_redirects_to_root() {
    let outcome = function().evaluate(ViewerRequest::new("www.example.com", "/"));
    assert_eq!(
        outcome,
        ViewerOutcome::Redirect {
            status: 301,
            location: "https://example.com/".to_string(),
        }
    );
}
