// Askama template definitions

use askama::Template;

use crate::api::auth::Claims;

#[derive(Template)]
#[template(path = "layout.html")]
pub struct LayoutTemplate {
    pub user: Option<Claims>,
}
