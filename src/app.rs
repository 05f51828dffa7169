use crate::context::Context;
use crate::error::Error;
use crate::render::TemplateEngine;
use std::sync::Arc;
use tracing::error;

/// A unit of request processing invoked with the per-request [`Context`].
///
/// A handler either writes a response (terminating the chain) or calls
/// [`Context::next`] to hand off to the handler after it. Doing neither
/// stalls the chain; the framework does not detect that, by contract.
pub trait Handler: Send + Sync {
    fn handle(&self, ctx: &mut Context);
}

impl<F> Handler for F
where
    F: Fn(&mut Context) + Send + Sync,
{
    fn handle(&self, ctx: &mut Context) {
        self(ctx)
    }
}

/// Application-level error handler invoked by [`Context::error`].
///
/// Receives every serialization/rendering failure funneled out of the
/// encoders so error-response policy lives in one place.
pub type ErrorHook = dyn Fn(&Error, &mut Context) + Send + Sync;

/// Application aggregate shared by every request context.
///
/// Holds the global middleware prefix, the debug flag that switches the
/// JSON/XML encoders between pretty and compact output, the template engine,
/// and the error hook. Configure it before wrapping in an `Arc` and handing
/// it to a [`ContextPool`](crate::ContextPool) / `AppService`.
pub struct App {
    debug: bool,
    middleware: Vec<Arc<dyn Handler>>,
    engine: Option<Arc<dyn TemplateEngine>>,
    error_hook: Option<Box<ErrorHook>>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Create an app with no middleware and debug mode seeded from the
    /// `GANTRY_DEBUG` environment variable (`1` or `true`).
    #[must_use]
    pub fn new() -> Self {
        let debug = std::env::var("GANTRY_DEBUG")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        Self {
            debug,
            middleware: Vec::new(),
            engine: None,
            error_hook: None,
        }
    }

    /// Whether debug/verbose output mode is on.
    #[must_use]
    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Append a global middleware handler. Middleware runs for every matched
    /// request, in registration order, ahead of the route handler.
    pub fn add_middleware(&mut self, mw: Arc<dyn Handler>) {
        self.middleware.push(mw);
    }

    /// The global middleware prefix seeded into every request chain.
    #[must_use]
    pub fn middleware(&self) -> &[Arc<dyn Handler>] {
        &self.middleware
    }

    /// Install the template-rendering collaborator used by `render`/`html`/`fetch`.
    pub fn set_template_engine(&mut self, engine: Arc<dyn TemplateEngine>) {
        self.engine = Some(engine);
    }

    #[must_use]
    pub fn template_engine(&self) -> Option<&Arc<dyn TemplateEngine>> {
        self.engine.as_ref()
    }

    /// Replace the default error handler.
    pub fn set_error_hook(&mut self, hook: Box<ErrorHook>) {
        self.error_hook = Some(hook);
    }

    /// Route an error to the configured hook, or apply the default policy:
    /// log it and, if nothing has been written yet, answer 500 with the
    /// error text in debug mode and a generic message otherwise.
    pub fn handle_error(&self, err: &Error, ctx: &mut Context) {
        if let Some(hook) = &self.error_hook {
            hook(err, ctx);
            return;
        }
        error!(error = %err, "request error");
        if !ctx.response.wrote() {
            let body = if self.debug {
                err.to_string()
            } else {
                "Internal Server Error".to_string()
            };
            ctx.string(500, &body);
        }
    }
}
