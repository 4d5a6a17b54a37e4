//! Textual HTML rewriting.
//!
//! # Passes
//! 1. Every absolute origin variant is replaced verbatim by the public host.
//! 2. Root-relative `href`/`src` values are routed back through the gateway.
//! 3. Root-relative `<form action>` values get the same treatment, with
//!    asset directories recognised in any case.
//!
//! # Design Decisions
//! - Regex over text, no DOM: matches inside scripts, inline JSON and
//!   comments are rewritten too
//! - Asset directories stay direct so the browser fetches them unproxied

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::rewrite::assets::is_asset_dir;

static ROOT_RELATIVE_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(href|src)=(?:"/([^"']*)"|'/([^"']*)')"#).expect("valid attribute pattern")
});

static FORM_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<form[^>]*").expect("valid form pattern"));

static FORM_ACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)action=(?:"/([^"']*)"|'/([^"']*)')"#).expect("valid action pattern")
});

/// Rewrites HTML documents served by the origin.
#[derive(Debug, Clone)]
pub struct HtmlRewriter {
    origins: Vec<String>,
    public_origin: String,
    gateway_path: String,
}

impl HtmlRewriter {
    /// `origins` are replaced, in order, by `public_origin`. Rewritten links
    /// point at `gateway_path`.
    pub fn new(origins: Vec<String>, public_origin: impl Into<String>, gateway_path: impl Into<String>) -> Self {
        Self {
            origins,
            public_origin: public_origin.into(),
            gateway_path: gateway_path.into(),
        }
    }

    pub fn rewrite(&self, html: &str) -> String {
        let mut out = html.to_string();
        for origin in self.origins.iter().filter(|o| !o.is_empty()) {
            if out.contains(origin.as_str()) {
                out = out.replace(origin.as_str(), &self.public_origin);
            }
        }

        let out = ROOT_RELATIVE_ATTR.replace_all(&out, |caps: &Captures| {
            let (quote, path) = quoted_path(caps);
            match self.gateway_link(path) {
                Some(link) => format!("{}={quote}{link}{quote}", &caps[1]),
                None => caps[0].to_string(),
            }
        });

        let out = FORM_TAG.replace_all(&out, |caps: &Captures| self.rewrite_form_tag(&caps[0]));

        out.into_owned()
    }

    /// Rewrite the last eligible `action=` inside one `<form …` tag.
    ///
    /// Asset directories are matched case-insensitively here.
    fn rewrite_form_tag(&self, tag: &str) -> String {
        let eligible = FORM_ACTION
            .captures_iter(tag)
            .filter_map(|caps| {
                let (quote, path) = quoted_path(&caps);
                if is_asset_dir(&path.to_ascii_lowercase()) {
                    return None;
                }
                let link = self.gateway_link(path)?;
                Some((caps.get(0)?.range(), quote, link))
            })
            .last();

        match eligible {
            Some((range, quote, link)) => format!(
                "{}action={quote}{link}{quote}{}",
                &tag[..range.start],
                &tag[range.end..]
            ),
            None => tag.to_string(),
        }
    }

    /// Gateway URL for a root-relative path given without its leading slash.
    ///
    /// `None` for asset directories and protocol-relative `//host` references.
    fn gateway_link(&self, rest: &str) -> Option<String> {
        if is_asset_dir(rest) || rest.starts_with('/') {
            return None;
        }

        let original = format!("/{rest}");
        Some(format!(
            "{}?path={}",
            self.gateway_path,
            urlencoding::encode(&original)
        ))
    }
}

/// The quote character and path of whichever alternative matched.
fn quoted_path<'h>(caps: &Captures<'h>) -> (char, &'h str) {
    match caps.get(2) {
        Some(path) => ('"', path.as_str()),
        None => ('\'', caps.get(3).map_or("", |m| m.as_str())),
    }
}
