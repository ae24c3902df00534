//! Prefix routers over radix-tree route tables.
//!
//! Each [`Router`] holds one [`matchit`] tree per HTTP method, its own
//! middleware, and child routers mounted under path prefixes. Lookup is
//! O(path-length) per tree.
//!
//! Patterns use `{name}` for a placeholder that spans exactly one non-empty
//! segment. Static segments win over placeholders at the same position, so
//! `/users/me` and `/users/{id}` can coexist.
//!
//! ```rust
//! use strata::{Method, Request, Response, Route, Router};
//! use strata::middleware::{RequireHeader, RequireSecret};
//!
//! # async fn list(_: Request) -> Response { Response::text("") }
//! # async fn remove(_: Request) -> Response { Response::text("") }
//! let api = Router::new()
//!     .layer(RequireHeader::new("x-api-key"))
//!     .get("/users", list)
//!     .route(Route::new(Method::Delete, "/users/{id}", remove)
//!         .layer(RequireSecret::new("x-admin-key", "s3cret")));
//!
//! let app = Router::new().mount("/api", api);
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::error::Error;
use crate::handler::{BoxedEndpoint, Handler};
use crate::method::Method;
use crate::middleware::{self, BoxedMiddleware, Middleware};

// ── Route ────────────────────────────────────────────────────────────────────

/// One method + pattern + handler, with route-level middleware.
///
/// Immutable once handed to [`Router::route`].
pub struct Route {
    method: Method,
    pattern: String,
    layers: Vec<BoxedMiddleware>,
    handler: BoxedEndpoint,
}

impl Route {
    pub fn new(method: Method, pattern: &str, handler: impl Handler) -> Self {
        Self {
            method,
            pattern: pattern.to_owned(),
            layers: Vec::new(),
            handler: handler.into_endpoint(),
        }
    }

    /// Adds route-level middleware. Runs after every router-level layer.
    pub fn layer(mut self, mw: impl Middleware) -> Self {
        self.layers.push(middleware::boxed(mw));
        self
    }

    pub fn method(&self) -> Method { self.method }
    pub fn pattern(&self) -> &str { &self.pattern }
}

// ── Router ───────────────────────────────────────────────────────────────────

/// A group of routes sharing middleware, optionally nested under a prefix.
///
/// Build it once at startup. Every builder method returns `self` so
/// registrations chain naturally.
#[derive(Default)]
pub struct Router {
    trees: HashMap<Method, MatchitRouter<Arc<Route>>>,
    routes: Vec<Arc<Route>>,
    layers: Vec<BoxedMiddleware>,
    // Longest prefix first.
    mounts: Vec<Mount>,
}

struct Mount {
    prefix: String,
    router: Router,
}

/// Outcome of resolving a request path.
pub(crate) enum Lookup {
    Found(Resolved),
    MethodNotAllowed(Vec<Method>),
    NotFound,
}

pub(crate) struct Resolved {
    pub(crate) pattern: String,
    pub(crate) params: HashMap<String, String>,
    /// Router layers root to leaf, then the route's own layers.
    pub(crate) layers: Vec<BoxedMiddleware>,
    pub(crate) handler: BoxedEndpoint,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for a method + pattern pair.
    ///
    /// # Panics
    ///
    /// On an invalid pattern or a pattern already registered for `method`.
    /// Use [`try_route`](Self::try_route) to handle that as an error.
    pub fn on(self, method: Method, pattern: &str, handler: impl Handler) -> Self {
        self.route(Route::new(method, pattern, handler))
    }

    pub fn get(self, pattern: &str, handler: impl Handler) -> Self {
        self.on(Method::Get, pattern, handler)
    }

    pub fn post(self, pattern: &str, handler: impl Handler) -> Self {
        self.on(Method::Post, pattern, handler)
    }

    pub fn put(self, pattern: &str, handler: impl Handler) -> Self {
        self.on(Method::Put, pattern, handler)
    }

    pub fn patch(self, pattern: &str, handler: impl Handler) -> Self {
        self.on(Method::Patch, pattern, handler)
    }

    pub fn delete(self, pattern: &str, handler: impl Handler) -> Self {
        self.on(Method::Delete, pattern, handler)
    }

    /// Registers a fully configured [`Route`].
    ///
    /// # Panics
    ///
    /// Same conditions as [`on`](Self::on).
    pub fn route(self, route: Route) -> Self {
        self.try_route(route).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_route(mut self, route: Route) -> Result<Self, Error> {
        validate_pattern(&route.pattern)?;
        let route = Arc::new(route);
        self.trees
            .entry(route.method)
            .or_default()
            .insert(route.pattern.clone(), Arc::clone(&route))
            .map_err(|e| Error::invalid_route(&route.pattern, e.to_string()))?;
        self.routes.push(route);
        Ok(self)
    }

    /// Adds router-level middleware. It runs for every route of this router
    /// and of routers mounted below it, in registration order.
    pub fn layer(mut self, mw: impl Middleware) -> Self {
        self.layers.push(middleware::boxed(mw));
        self
    }

    /// Nests `child` under `prefix`. Requests below the prefix are matched
    /// against the child with the prefix stripped: `/api/users` reaches the
    /// child's `/users` route.
    ///
    /// # Panics
    ///
    /// If `prefix` is not of the form `/segment[/segment…]`.
    pub fn mount(self, prefix: &str, child: Router) -> Self {
        self.try_mount(prefix, child).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_mount(mut self, prefix: &str, child: Router) -> Result<Self, Error> {
        validate_prefix(prefix)?;
        if self.mounts.iter().any(|m| m.prefix == prefix) {
            return Err(Error::invalid_route(prefix, "prefix already mounted"));
        }
        self.mounts.push(Mount { prefix: prefix.to_owned(), router: child });
        self.mounts.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
        Ok(self)
    }

    /// Every registered route as `(method, full pattern)`, own routes first.
    pub fn routes(&self) -> Vec<(Method, String)> {
        let mut out: Vec<_> = self
            .routes
            .iter()
            .map(|r| (r.method, r.pattern.clone()))
            .collect();
        for mount in &self.mounts {
            out.extend(
                mount.router.routes().into_iter().map(|(m, p)| (m, join(&mount.prefix, &p))),
            );
        }
        out
    }

    /// A match anywhere wins over a 405 from a longer prefix; the allowed
    /// methods of every candidate are merged.
    pub(crate) fn resolve(&self, method: Method, path: &str) -> Lookup {
        let mut allowed = Vec::new();
        for mount in &self.mounts {
            let Some(rest) = strip_mount(path, &mount.prefix) else { continue };
            match mount.router.resolve(method, rest) {
                Lookup::NotFound => {}
                Lookup::MethodNotAllowed(methods) => allowed.extend(methods),
                Lookup::Found(mut found) => {
                    let mut layers = self.layers.clone();
                    layers.append(&mut found.layers);
                    found.layers = layers;
                    found.pattern = join(&mount.prefix, &found.pattern);
                    return Lookup::Found(found);
                }
            }
        }

        match self.resolve_own(method, path) {
            Lookup::Found(found) => Lookup::Found(found),
            Lookup::MethodNotAllowed(methods) => not_allowed(allowed, methods),
            Lookup::NotFound => not_allowed(allowed, Vec::new()),
        }
    }

    fn resolve_own(&self, method: Method, path: &str) -> Lookup {
        if let Some((route, params)) = self.trees.get(&method).and_then(|t| at(t, path)) {
            let layers = self.layers.iter().chain(&route.layers).cloned().collect();
            return Lookup::Found(Resolved {
                pattern: route.pattern.clone(),
                params,
                layers,
                handler: Arc::clone(&route.handler),
            });
        }

        let mut allowed: Vec<Method> = self
            .trees
            .iter()
            .filter(|(m, tree)| **m != method && at(tree, path).is_some())
            .map(|(m, _)| *m)
            .collect();
        if allowed.is_empty() {
            return Lookup::NotFound;
        }
        allowed.sort();
        Lookup::MethodNotAllowed(allowed)
    }
}

fn not_allowed(mut allowed: Vec<Method>, more: Vec<Method>) -> Lookup {
    allowed.extend(more);
    if allowed.is_empty() {
        return Lookup::NotFound;
    }
    allowed.sort();
    allowed.dedup();
    Lookup::MethodNotAllowed(allowed)
}

fn at<'t>(tree: &'t MatchitRouter<Arc<Route>>, path: &str) -> Option<(&'t Arc<Route>, HashMap<String, String>)> {
    let matched = tree.at(path).ok()?;
    if matched.params.iter().any(|(_, v)| v.is_empty()) {
        return None;
    }
    let params = matched
        .params
        .iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();
    Some((matched.value, params))
}

/// `"/api/users"` under `"/api"` → `"/users"`; `"/api"` → `"/"`;
/// `"/apis"` → no match.
fn strip_mount<'p>(path: &'p str, prefix: &str) -> Option<&'p str> {
    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() {
        Some("/")
    } else if rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

fn join(prefix: &str, pattern: &str) -> String {
    if pattern == "/" { prefix.to_owned() } else { format!("{prefix}{pattern}") }
}

fn validate_pattern(pattern: &str) -> Result<(), Error> {
    let fail = |reason: String| Error::invalid_route(pattern, reason);

    if !pattern.starts_with('/') {
        return Err(fail("pattern must start with `/`".into()));
    }
    let mut names = HashSet::new();
    for segment in pattern.split('/').skip(1) {
        if !segment.contains(['{', '}']) {
            continue;
        }
        let name = segment
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .ok_or_else(|| fail(format!("placeholder must span the whole segment, got `{segment}`")))?;
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(fail(format!("invalid parameter name `{name}`")));
        }
        if !names.insert(name) {
            return Err(fail(format!("duplicate parameter `{name}`")));
        }
    }
    Ok(())
}

fn validate_prefix(prefix: &str) -> Result<(), Error> {
    let ok = prefix.len() > 1
        && prefix.starts_with('/')
        && !prefix.ends_with('/')
        && !prefix.contains(['{', '}'])
        && !prefix.contains("//");
    if ok {
        Ok(())
    } else {
        Err(Error::invalid_route(prefix, "mount prefix must look like `/segment`"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::Next;
    use crate::request::Request;
    use crate::response::Response;

    async fn noop(_req: Request) -> Response {
        Response::text("")
    }

    async fn pass(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    fn found(lookup: Lookup) -> Resolved {
        match lookup {
            Lookup::Found(r) => r,
            Lookup::MethodNotAllowed(m) => panic!("expected a match, got 405 {m:?}"),
            Lookup::NotFound => panic!("expected a match, got 404"),
        }
    }

    #[test]
    fn binds_path_parameters() {
        let router = Router::new().get("/users/{id}", noop);
        let r = found(router.resolve(Method::Get, "/users/123"));
        assert_eq!(r.params["id"], "123");
        assert_eq!(r.pattern, "/users/{id}");
    }

    #[test]
    fn segment_count_must_match() {
        let router = Router::new().get("/users/{id}", noop);
        assert!(matches!(router.resolve(Method::Get, "/users"), Lookup::NotFound));
        assert!(matches!(router.resolve(Method::Get, "/users/1/posts"), Lookup::NotFound));
        assert!(matches!(router.resolve(Method::Get, "/users/"), Lookup::NotFound));
    }

    #[test]
    fn static_segments_beat_placeholders() {
        let router = Router::new()
            .get("/users/{id}", noop)
            .get("/users/me", noop);
        assert_eq!(found(router.resolve(Method::Get, "/users/me")).pattern, "/users/me");
        assert_eq!(found(router.resolve(Method::Get, "/users/7")).pattern, "/users/{id}");
    }

    #[test]
    fn other_methods_on_a_known_path_are_not_allowed() {
        let router = Router::new()
            .get("/users/{id}", noop)
            .delete("/users/{id}", noop)
            .put("/users/{id}", noop);
        match router.resolve(Method::Post, "/users/9") {
            Lookup::MethodNotAllowed(allowed) => {
                assert_eq!(allowed, [Method::Get, Method::Put, Method::Delete]);
            }
            _ => panic!("expected 405"),
        }
        assert!(matches!(router.resolve(Method::Post, "/nope"), Lookup::NotFound));
    }

    #[test]
    fn mounted_routers_see_the_stripped_path() {
        let api = Router::new().get("/users", noop).get("/", noop);
        let root = Router::new().get("/", noop).mount("/api", api);

        assert_eq!(found(root.resolve(Method::Get, "/api/users")).pattern, "/api/users");
        assert_eq!(found(root.resolve(Method::Get, "/api")).pattern, "/api");
        assert_eq!(found(root.resolve(Method::Get, "/")).pattern, "/");
        assert!(matches!(root.resolve(Method::Get, "/apiusers"), Lookup::NotFound));
    }

    #[test]
    fn longest_prefix_wins_and_misses_fall_through() {
        let v2 = Router::new().get("/status", noop);
        let api = Router::new().get("/status", noop).get("/only-api", noop);
        let root = Router::new()
            .mount("/api", api)
            .mount("/api/v2", v2)
            .get("/api/v2/legacy", noop);

        assert_eq!(found(root.resolve(Method::Get, "/api/v2/status")).pattern, "/api/v2/status");
        assert_eq!(found(root.resolve(Method::Get, "/api/status")).pattern, "/api/status");
        assert_eq!(found(root.resolve(Method::Get, "/api/v2/legacy")).pattern, "/api/v2/legacy");
    }

    #[test]
    fn shorter_prefix_match_beats_longer_prefix_405() {
        let root = Router::new()
            .mount("/api", Router::new().get("/v2/x", noop))
            .mount("/api/v2", Router::new().post("/x", noop));

        assert_eq!(found(root.resolve(Method::Get, "/api/v2/x")).pattern, "/api/v2/x");
        assert_eq!(found(root.resolve(Method::Post, "/api/v2/x")).pattern, "/api/v2/x");
    }

    #[test]
    fn allowed_methods_merge_across_prefixes() {
        let root = Router::new()
            .mount("/api", Router::new().get("/v2/x", noop))
            .mount("/api/v2", Router::new().post("/x", noop).get("/x", noop))
            .delete("/api/v2/x", noop);

        match root.resolve(Method::Put, "/api/v2/x") {
            Lookup::MethodNotAllowed(allowed) => {
                assert_eq!(allowed, [Method::Get, Method::Post, Method::Delete]);
            }
            _ => panic!("expected 405"),
        }
    }

    #[test]
    fn layers_accumulate_root_to_leaf_then_route() {
        let leaf = Router::new()
            .layer(pass)
            .route(Route::new(Method::Get, "/x", noop).layer(pass).layer(pass));
        let mid = Router::new().layer(pass).layer(pass).mount("/leaf", leaf);
        let root = Router::new().layer(pass).mount("/mid", mid).get("/plain", noop);

        assert_eq!(found(root.resolve(Method::Get, "/mid/leaf/x")).layers.len(), 6);
        assert_eq!(found(root.resolve(Method::Get, "/plain")).layers.len(), 1);
    }

    #[test]
    fn lists_routes_with_full_paths() {
        let api = Router::new().get("/users", noop).delete("/users/{id}", noop);
        let root = Router::new().get("/", noop).mount("/api", api);
        assert_eq!(
            root.routes(),
            [
                (Method::Get, "/".to_owned()),
                (Method::Get, "/api/users".to_owned()),
                (Method::Delete, "/api/users/{id}".to_owned()),
            ]
        );
    }

    #[test]
    fn rejects_duplicate_routes_per_method() {
        let err = Router::new()
            .get("/users", noop)
            .try_route(Route::new(Method::Get, "/users", noop))
            .err()
            .expect("duplicate should fail");
        assert!(matches!(err, Error::InvalidRoute { .. }));

        // Same path, different method, is fine.
        assert!(Router::new().get("/users", noop).try_route(Route::new(Method::Post, "/users", noop)).is_ok());
    }

    #[test]
    fn rejects_malformed_patterns() {
        for bad in ["users", "/a/{id}/{id}", "/a/x{id}", "/a/{}", "/a/{*rest}"] {
            let res = Router::new().try_route(Route::new(Method::Get, bad, noop));
            assert!(res.is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    #[should_panic(expected = "invalid route")]
    fn builder_panics_on_conflict() {
        let _ = Router::new().get("/a", noop).get("/a", noop);
    }

    #[test]
    fn rejects_malformed_prefixes() {
        for bad in ["/", "api", "/api/", "/{id}"] {
            assert!(Router::new().try_mount(bad, Router::new()).is_err(), "{bad}");
        }
        assert!(Router::new().mount("/api", Router::new()).try_mount("/api", Router::new()).is_err());
    }
}
