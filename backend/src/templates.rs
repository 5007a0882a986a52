//! HTML page templates
//!
//! Pages are embedded at compile time and rendered with minijinja.

use crate::error::AppError;
use axum::response::Html;
use minijinja::{Environment, Value};

/// Compiled page templates
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    /// Load all embedded templates
    pub fn new() -> Result<Self, AppError> {
        let mut env = Environment::new();
        env.add_template("base.html", include_str!("../templates/base.html"))?;
        env.add_template("login.html", include_str!("../templates/login.html"))?;
        env.add_template("register.html", include_str!("../templates/register.html"))?;
        env.add_template("chat.html", include_str!("../templates/chat.html"))?;
        env.add_template("contact.html", include_str!("../templates/contact.html"))?;
        Ok(Self { env })
    }

    /// Render template `name` with `ctx`
    pub fn render(&self, name: &str, ctx: Value) -> Result<Html<String>, AppError> {
        let html = self.env.get_template(name)?.render(ctx)?;
        Ok(Html(html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_login_renders_error() {
        let templates = Templates::new().unwrap();
        let Html(page) = templates
            .render("login.html", context! { error => "Invalid username or password" })
            .unwrap();
        assert!(page.contains("Invalid username or password"));
        assert!(page.contains("action=\"/login\""));
    }

    #[test]
    fn test_chat_escapes_name() {
        let templates = Templates::new().unwrap();
        let Html(page) = templates
            .render("chat.html", context! { name => "<bob>", references => true })
            .unwrap();
        assert!(page.contains("Hello, &lt;bob&gt;"));
        assert!(page.contains("const references = true;"));
        assert!(page.contains("references && data.stored"));
        assert!(!page.contains("startsWith(\"Error\")"));
        assert!(page.contains("/contact"));
    }

    #[test]
    fn test_unknown_template() {
        let templates = Templates::new().unwrap();
        assert!(templates.render("missing.html", context! {}).is_err());
    }
}
