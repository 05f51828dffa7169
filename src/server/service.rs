use super::request::parse_request;
use super::response::flush_response;
use crate::app::App;
use crate::pool::ContextPool;
use crate::router::Router;
use may_minihttp::{HttpService, Request, Response};
use std::io;
use std::sync::Arc;
use tracing::debug;

/// `may_minihttp` service gluing the transport to the context core.
///
/// For each request: parse, check a context slot out of the pool, let the
/// router populate parameters and handlers, drive the chain with a single
/// `next()`, then flush whatever the chain wrote and restore the slot.
#[derive(Clone)]
pub struct AppService {
    pub app: Arc<App>,
    pub router: Arc<dyn Router>,
    pub pool: Arc<ContextPool>,
}

impl AppService {
    #[must_use]
    pub fn new(app: Arc<App>, router: Arc<dyn Router>) -> Self {
        let pool = Arc::new(ContextPool::new(app.clone()));
        Self { app, router, pool }
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let request = parse_request(req);
        let method = request.method.clone();
        let path = request.path.clone();

        let mut ctx = self.pool.checkout(request);
        if self.router.resolve(&method, &path, &mut ctx) {
            ctx.next();
            // A matched chain that wrote nothing is a handler-contract
            // violation, not a framework error; the buffered (empty 200)
            // response goes out as-is.
            if !ctx.response.wrote() {
                debug!(method = %method, path = %path, "chain finished without writing");
            }
        } else {
            ctx.json(
                404,
                &serde_json::json!({
                    "error": "Not Found",
                    "method": method.as_str(),
                    "path": path,
                }),
            );
        }

        flush_response(&ctx.response, res);
        self.pool.restore(ctx);
        Ok(())
    }
}
