//! Public landing page.

use askama::Template;
use askama_web::WebTemplate;

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate;

/// Landing page handler.
///
/// Signed-in visitors never reach this; route authorization sends them to
/// the dashboard.
pub async fn home() -> HomeTemplate {
    HomeTemplate
}
