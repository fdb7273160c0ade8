use std::path::Path;

use log::debug;

use crate::error::{self, Result};

pub(crate) const POST_TEMPLATE: &str = "post.html";
pub(crate) const INDEX_TEMPLATE: &str = "index.html";

/// Raw template text. `{{NAME}}` tokens are the only structure recognised.
#[derive(Debug, Clone)]
pub(crate) struct Templates {
    pub post: String,
    pub index: String,
}

impl Templates {
    pub fn load(template_dir: &Path) -> Result<Self> {
        debug!("Loading templates from {template_dir:?}");
        Ok(Self {
            post: error::read_to_string(&template_dir.join(POST_TEMPLATE))?,
            index: error::read_to_string(&template_dir.join(INDEX_TEMPLATE))?,
        })
    }
}

/// Replaces every `{{NAME}}` for each `(NAME, value)` pair, in order.
///
/// Literal substring replacement: tokens absent from `values` stay verbatim,
/// and pairs whose token does not occur are no-ops. Nothing is escaped.
pub(crate) fn render(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_string(), |page, (name, value)| {
            page.replace(&format!("{{{{{name}}}}}"), value)
        })
}
