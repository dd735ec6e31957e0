use std::fs;
use std::path::Path;

use handlebars::Handlebars;
use serde::Serialize;

use crate::app::{FeedDigestError, Result};
use crate::domain::Entry;

/// Default Markdown template for weekly and summary documents.
const DEFAULT_TEMPLATE: &str = include_str!("../../templates/digest.md.hbs");

const TEMPLATE_NAME: &str = "digest";

/// Template data for one document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentData<'a> {
    pub title: String,
    pub user_name: &'a str,
    pub items: Vec<ItemView<'a>>,
    /// Number of entries in `items`.
    pub shown: usize,
    /// Total archive size; zero for weekly documents.
    pub count: usize,
    pub summary: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemView<'a> {
    pub title: &'a str,
    pub link: &'a str,
    pub description: &'a str,
    pub published: &'a str,
    /// `YYYY-MM-DD` part of `published`.
    pub date: &'a str,
}

impl<'a> From<&'a Entry> for ItemView<'a> {
    fn from(entry: &'a Entry) -> Self {
        Self {
            title: &entry.title,
            link: &entry.link,
            description: &entry.description,
            published: &entry.published,
            date: entry.published.get(..10).unwrap_or(entry.published.as_str()),
        }
    }
}

pub trait Render {
    fn render(&self, data: &DocumentData<'_>) -> Result<String>;
}

/// Handlebars renderer with HTML escaping disabled, since output is Markdown.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl TemplateRenderer {
    pub fn new() -> Result<Self> {
        Self::from_source(DEFAULT_TEMPLATE)
    }

    /// Uses a custom template file instead of the built-in one.
    pub fn with_template(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|e| {
            FeedDigestError::Config(format!("cannot read template {}: {}", path.display(), e))
        })?;
        Self::from_source(&source)
    }

    pub fn from_source(source: &str) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.register_template_string(TEMPLATE_NAME, source)?;
        Ok(Self { handlebars })
    }
}

impl Render for TemplateRenderer {
    fn render(&self, data: &DocumentData<'_>) -> Result<String> {
        Ok(self.handlebars.render(TEMPLATE_NAME, data)?)
    }
}
