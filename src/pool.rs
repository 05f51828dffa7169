//! Reusable context slots.
//!
//! Contexts are checked out at the start of a request, reset against the new
//! request, and restored once the response is flushed, so steady-state
//! traffic does no per-request context allocation. Only the pool itself
//! locks; a checked-out context is single-owner until restored.

use crate::app::App;
use crate::context::Context;
use crate::server::Request;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Pool of reusable per-request [`Context`] slots.
pub struct ContextPool {
    app: Arc<App>,
    slots: Mutex<Vec<Context>>,
}

impl ContextPool {
    #[must_use]
    pub fn new(app: Arc<App>) -> Self {
        Self {
            app,
            slots: Mutex::new(Vec::new()),
        }
    }

    /// Pre-create `capacity` idle slots.
    #[must_use]
    pub fn with_capacity(app: Arc<App>, capacity: usize) -> Self {
        let slots = (0..capacity).map(|_| Context::new(app.clone())).collect();
        Self {
            app,
            slots: Mutex::new(slots),
        }
    }

    /// Take a slot (creating one if the pool is empty) and reset it against
    /// the given request.
    #[must_use]
    pub fn checkout(&self, request: Request) -> Context {
        let slot = self.slots.lock().unwrap().pop();
        let mut ctx = match slot {
            Some(ctx) => ctx,
            None => {
                debug!("context pool empty, allocating a new slot");
                Context::new(self.app.clone())
            }
        };
        ctx.reset(request);
        ctx
    }

    /// Return a slot to the pool after its response has been finalized.
    pub fn restore(&self, ctx: Context) {
        self.slots.lock().unwrap().push(ctx);
    }

    /// Number of idle slots.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.slots.lock().unwrap().len()
    }
}
