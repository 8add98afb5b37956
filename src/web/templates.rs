//! HTML page templates.

use minijinja::{Environment, Value};

use crate::file::format_size;
use crate::Result;

/// Listing page.
pub const INDEX: &str = "index.html";
/// Login page.
pub const LOGIN: &str = "login.html";
/// Registration page.
pub const REGISTER: &str = "register.html";

/// Build the template environment with the bundled pages.
pub fn build_environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();

    env.add_template(INDEX, include_str!("../../templates/index.html"))?;
    env.add_template(LOGIN, include_str!("../../templates/login.html"))?;
    env.add_template(REGISTER, include_str!("../../templates/register.html"))?;
    env.add_filter("filesize", |bytes: u64| format_size(bytes));

    Ok(env)
}

/// Render a named template with the given context.
pub fn render(env: &Environment<'static>, name: &str, ctx: Value) -> Result<String> {
    Ok(env.get_template(name)?.render(ctx)?)
}
