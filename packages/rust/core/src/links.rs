//! Deep links from the README into the full answers on the site.

use std::collections::BTreeMap;

use url::{Url, form_urlencoded};

use quizbook_shared::{AppConfig, Result, SLUG_PLACEHOLDER};

/// Builds `<site_url><question_path>?<query>` links for question slugs.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    site_url: Url,
    question_path: String,
    query: BTreeMap<String, String>,
}

impl LinkBuilder {
    pub fn new(site_url: Url, question_path: impl Into<String>, query: BTreeMap<String, String>) -> Self {
        Self {
            site_url,
            question_path: question_path.into(),
            query,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self::new(
            config.site_url()?,
            config.links.question_path.clone(),
            config.links.query.clone(),
        ))
    }

    /// Base URL used for absolutizing root-relative links.
    pub fn site_url(&self) -> &Url {
        &self.site_url
    }

    /// Deep link for a question: the site URL with the question path appended.
    /// Query parameters are emitted in key order.
    pub fn question_href(&self, slug: &str) -> String {
        let path = self.question_path.replace(SLUG_PLACEHOLDER, slug);
        let base = self.site_url.as_str().trim_end_matches('/');
        let separator = if path.starts_with('/') { "" } else { "/" };
        let mut href = format!("{base}{separator}{path}");

        if !self.query.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&self.query)
                .finish();
            href.push('?');
            href.push_str(&query);
        }

        href
    }
}
