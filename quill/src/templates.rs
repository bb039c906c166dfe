//! HTML templates, compiled into the binary.

use minijinja::{Environment, context};

use crate::{api::models::posts::PostResponse, errors::Error, types::PostId};

const ARTICLE_TEMPLATE: &str = "article.html";

/// The template environment. Built once at startup; `.html` templates are auto-escaped.
#[derive(Debug)]
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, Error> {
        let mut env = Environment::new();
        env.add_template(ARTICLE_TEMPLATE, include_str!("../templates/article.html"))
            .map_err(|e| Error::Internal {
                operation: format!("load article template: {e}"),
            })?;

        Ok(Self { env })
    }

    pub fn render_article(&self, article_id: PostId, article: &PostResponse) -> Result<String, Error> {
        let template = self.env.get_template(ARTICLE_TEMPLATE).map_err(|e| Error::Internal {
            operation: format!("get article template: {e}"),
        })?;

        template
            .render(context! { article_id => article_id, article => article })
            .map_err(|e| Error::Internal {
                operation: format!("render article {article_id}: {e}"),
            })
    }
}
