use gantry::{App, Context, ContextPool, Request};
use std::sync::Arc;

/// Checkout a context for a request against a plain non-debug app.
#[allow(dead_code)]
pub fn make_context(request: Request) -> Context {
    let mut app = App::new();
    // keep tests independent of the ambient GANTRY_DEBUG setting
    app.set_debug(false);
    make_context_with(app, request)
}

/// Checkout a context for a request against a caller-configured app.
#[allow(dead_code)]
pub fn make_context_with(app: App, request: Request) -> Context {
    ContextPool::new(Arc::new(app)).checkout(request)
}
