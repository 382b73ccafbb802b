//! Path/header scoping over a parent requester.
//!
//! # Design
//! A `Scope` borrows its parent, so it can never outlive it, and owns no
//! transport. Every call prefixes the segment, layers the scope's default
//! headers under the caller's, and forwards to the parent. Chaining scopes
//! therefore accumulates segments root-to-leaf and lets the most specific
//! header win.

use crate::error::ApiError;
use crate::headers::Headers;
use crate::http::HttpMethod;
use crate::requester::{RequestOptions, Requester};
use crate::response::ResponseBody;

/// A requester scoped to a path segment under `parent`.
#[derive(Debug)]
pub struct Scope<'p, P: Requester + ?Sized> {
    parent: &'p P,
    segment: String,
    default_headers: Headers,
}

impl<'p, P: Requester + ?Sized> Scope<'p, P> {
    pub fn new(parent: &'p P, segment: &str, default_headers: Headers) -> Self {
        Self {
            parent,
            segment: segment.to_string(),
            default_headers,
        }
    }

    pub fn parent(&self) -> &'p P {
        self.parent
    }

    pub fn segment(&self) -> &str {
        &self.segment
    }

    pub fn default_headers(&self) -> &Headers {
        &self.default_headers
    }

    /// `/segment/path` with every run of `/` collapsed to one.
    pub fn scoped_path(&self, path: &str) -> String {
        collapse_slashes(&format!("/{}/{}", self.segment, path))
    }
}

impl<P: Requester + ?Sized> Requester for Scope<'_, P> {
    fn send(
        &self,
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
    ) -> Result<ResponseBody, ApiError> {
        let path = self.scoped_path(path);
        let options = RequestOptions {
            headers: self.default_headers.merged(&options.headers),
            ..options
        };
        self.parent.send(method, &path, options)
    }
}

pub(crate) fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        if c == '/' && out.ends_with('/') {
            continue;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records what reaches it instead of sending anything.
    #[derive(Default)]
    struct Sink {
        calls: RefCell<Vec<(HttpMethod, String, Headers)>>,
    }

    impl Requester for Sink {
        fn send(
            &self,
            method: HttpMethod,
            path: &str,
            options: RequestOptions,
        ) -> Result<ResponseBody, ApiError> {
            self.calls
                .borrow_mut()
                .push((method, path.to_string(), options.headers));
            Ok(ResponseBody::Empty)
        }
    }

    #[test]
    fn collapse_removes_runs() {
        assert_eq!(collapse_slashes("//a///b/"), "/a/b/");
        assert_eq!(collapse_slashes("///"), "/");
        assert_eq!(collapse_slashes("/a/b"), "/a/b");
    }

    #[test]
    fn segment_slashes_do_not_matter() {
        let sink = Sink::default();
        for segment in ["widgets", "/widgets", "widgets/", "//widgets//"] {
            for path in ["123", "/123", "//123"] {
                let scope = sink.new_scope(segment, Headers::new());
                assert_eq!(scope.scoped_path(path), "/widgets/123", "{segment:?} {path:?}");
            }
        }
    }

    #[test]
    fn root_segment_adds_nothing() {
        let sink = Sink::default();
        let scope = sink.new_scope("/", Headers::new());
        let inner = scope.new_scope("", Headers::new());
        assert_eq!(inner.scoped_path("a/b"), "/a/b");
        inner.get("a/b", RequestOptions::new()).unwrap();
        assert_eq!(sink.calls.borrow()[0].1, "/a/b");
    }

    #[test]
    fn nested_scopes_concatenate_segments() {
        let sink = Sink::default();
        let a = sink.new_scope("/a/", Headers::new());
        let b = a.new_scope("b", Headers::new());
        let c = b.new_scope("/c", Headers::new());
        c.delete("/leaf/", RequestOptions::new()).unwrap();

        let calls = sink.calls.borrow();
        assert_eq!(calls[0].0, HttpMethod::Delete);
        assert_eq!(calls[0].1, "/a/b/c/leaf/");
    }

    #[test]
    fn most_specific_header_wins() {
        let sink = Sink::default();
        let outer = sink.new_scope("o", Headers::from([("X-Level", "outer"), ("X-Outer", "1")]));
        let inner = outer.new_scope("i", Headers::from([("x-level", "inner")]));
        inner
            .put("p", RequestOptions::new().header("X-Call", "1"))
            .unwrap();
        inner
            .patch("p", RequestOptions::new().header("X-LEVEL", "call"))
            .unwrap();

        let calls = sink.calls.borrow();
        assert_eq!(calls[0].2.get("x-level"), Some("inner"));
        assert_eq!(calls[0].2.get("x-outer"), Some("1"));
        assert_eq!(calls[0].2.get("x-call"), Some("1"));
        assert_eq!(calls[1].2.get("x-level"), Some("call"));
    }

    #[test]
    fn scope_is_immutable_view() {
        let sink = Sink::default();
        let scope = sink.new_scope("w", Headers::from([("A", "1")]));
        scope
            .post("x", RequestOptions::new().header("A", "2"))
            .unwrap();
        assert_eq!(scope.default_headers().get("a"), Some("1"));
        assert_eq!(scope.segment(), "w");
    }
}
