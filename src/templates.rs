//! HTML rendering for the upload form.
//!
//! The single page is a minijinja template embedded at compile time. It is
//! rendered in three states: blank form, form with an error banner, and
//! form with a success banner plus download link.

use minijinja::{Environment, context};
use once_cell::sync::Lazy;

static ENV: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.add_template("index.html", include_str!("templates/index.html"))
        .expect("embedded index template must parse");
    env
});

/// Render the upload form, optionally annotated with an error message or a
/// link to a finished conversion.
pub fn render_index(error: Option<&str>, download_url: Option<&str>) -> Result<String, minijinja::Error> {
    let template = ENV.get_template("index.html")?;
    template.render(context! { error, download_url })
}
