//! Routing seam.
//!
//! The context core consumes routing through the narrow [`Router`] trait:
//! given a method and path, populate route parameters on the context and
//! append the matched handler(s) after the global middleware prefix.
//! Routing-tree design is out of scope here; [`RouteTable`] is a small
//! segment matcher sufficient to wire the framework together.

use crate::app::Handler;
use crate::context::Context;
use http::Method;
use std::sync::Arc;

/// Resolves a request to a handler chain.
pub trait Router: Send + Sync {
    /// On a match: call [`Context::set_param`] for each matched path segment
    /// and [`Context::push_handler`] for the route handler(s), then return
    /// `true`. On a miss: leave the context untouched and return `false`.
    fn resolve(&self, method: &Method, path: &str, ctx: &mut Context) -> bool;
}

enum Segment {
    Literal(String),
    Param(String),
}

struct RouteEntry {
    method: Method,
    segments: Vec<Segment>,
    handler: Arc<dyn Handler>,
}

/// Linear-scan route table matching literal segments and `{name}` params.
#[derive(Default)]
pub struct RouteTable {
    routes: Vec<RouteEntry>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a method and pattern like `/pets/{id}`.
    pub fn add(&mut self, method: Method, pattern: &str, handler: Arc<dyn Handler>) {
        let segments = pattern
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                match s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some(name) => Segment::Param(name.to_string()),
                    None => Segment::Literal(s.to_string()),
                }
            })
            .collect();
        self.routes.push(RouteEntry {
            method,
            segments,
            handler,
        });
    }
}

impl Router for RouteTable {
    fn resolve(&self, method: &Method, path: &str, ctx: &mut Context) -> bool {
        let parts: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        'routes: for route in &self.routes {
            if &route.method != method || route.segments.len() != parts.len() {
                continue;
            }
            let mut params: Vec<(&str, &str)> = Vec::new();
            for (segment, part) in route.segments.iter().zip(&parts) {
                match segment {
                    Segment::Literal(lit) if lit == part => {}
                    Segment::Param(name) => params.push((name, part)),
                    _ => continue 'routes,
                }
            }
            for (name, value) in params {
                ctx.set_param(name, value);
            }
            ctx.push_handler(route.handler.clone());
            return true;
        }
        false
    }
}
