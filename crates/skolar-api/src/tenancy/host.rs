//! Host-based route table selection.
//!
//! Two disjoint routers are built at startup: the master console (tenant
//! provisioning) and the school app. `HostSwitch` dispatches each request to
//! one of them based on the Host header alone, before any other routing runs.
//! On a school host the provisioning routes do not exist at all, so hitting
//! them yields the same generic 404 as a typo.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use tower::{Service, ServiceExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostClass {
    /// Master console: provisioning surface reachable.
    Admin,
    /// School app: the more restrictive table, also the fallback.
    School,
}

/// Classify a Host header against the configured admin hosts. Ports are
/// stripped and matching is case-insensitive. An absent or malformed header
/// fails closed to the school table; nothing routes to the console by
/// accident.
pub fn classify_host(host: Option<&str>, admin_hosts: &[String]) -> HostClass {
    let Some(host) = host else {
        return HostClass::School;
    };
    let Some(name) = host.split(':').next() else {
        return HostClass::School;
    };
    let name = name.trim().to_ascii_lowercase();
    if !name.is_empty() && admin_hosts.iter().any(|h| h == &name) {
        HostClass::Admin
    } else {
        HostClass::School
    }
}

/// Top-level service dispatching to one of two routers per request.
#[derive(Clone)]
pub struct HostSwitch {
    admin_hosts: Arc<Vec<String>>,
    admin: Router,
    school: Router,
}

impl HostSwitch {
    pub fn new(admin_hosts: Vec<String>, admin: Router, school: Router) -> Self {
        Self {
            admin_hosts: Arc::new(admin_hosts),
            admin,
            school,
        }
    }

    /// Wrap the switch back into a `Router` so it can be served or driven by
    /// test clients like any other axum app.
    pub fn into_router(self) -> Router {
        Router::new().fallback_service(self)
    }

    fn host_header(request: &Request<Body>) -> Option<&str> {
        request
            .headers()
            .get(http::header::HOST)
            .and_then(|h| h.to_str().ok())
    }
}

impl Service<Request<Body>> for HostSwitch {
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Infallible>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let class = classify_host(Self::host_header(&request), &self.admin_hosts);
        tracing::debug!(?class, "Selected route table");
        let router = match class {
            HostClass::Admin => self.admin.clone(),
            HostClass::School => self.school.clone(),
        };
        Box::pin(router.oneshot(request))
    }
}
