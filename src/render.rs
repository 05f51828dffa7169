use crate::error::Error;
use minijinja::Environment;
use serde_json::Value;
use std::collections::HashMap;
use std::io::Write;

/// Template-rendering collaborator invoked by the HTML encoders.
///
/// The context map handed to `render` is the request's scratch store, so
/// anything handlers `set()` on the context is visible to the template.
pub trait TemplateEngine: Send + Sync {
    /// Render `template` with `ctx` into `out`.
    fn render(
        &self,
        out: &mut dyn Write,
        template: &str,
        ctx: &HashMap<String, Value>,
    ) -> Result<(), Error>;
}

/// [`TemplateEngine`] backed by a preloaded minijinja environment.
pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl Default for MiniJinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MiniJinjaEngine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
        }
    }

    /// Register a template under a name handlers can render by.
    pub fn add_template(&mut self, name: &str, source: &str) -> Result<(), Error> {
        self.env
            .add_template_owned(name.to_string(), source.to_string())?;
        Ok(())
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn render(
        &self,
        out: &mut dyn Write,
        template: &str,
        ctx: &HashMap<String, Value>,
    ) -> Result<(), Error> {
        let tmpl = self.env.get_template(template)?;
        let rendered = tmpl.render(ctx)?;
        out.write_all(rendered.as_bytes())?;
        Ok(())
    }
}
