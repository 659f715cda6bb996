//! Slug formatting for content-relative file paths.
//!
//! Standard docs and developer docs use different rule sets. Developer docs
//! never strip the `platforms/` prefix and have no `_category_` files.

use std::sync::LazyLock;

use regex::Regex;

static PLATFORMS_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^platforms/").expect("valid regex"));

static CATEGORY_FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/_category_\.mdx?$").expect("valid regex"));

static INDEX_FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/index\.mdx?$").expect("valid regex"));

static EXTENSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.mdx?$").expect("valid regex"));

/// Slug for a file under the standard `docs/` root.
pub fn format_docs_slug(rel_path: &str) -> String {
    let slug = PLATFORMS_PREFIX_RE.replace(rel_path, "");
    let slug = CATEGORY_FILE_RE.replace(&slug, "");
    format_develop_docs_slug(&slug)
}

/// Slug for a file under the `develop-docs/` root.
pub fn format_develop_docs_slug(rel_path: &str) -> String {
    let slug = INDEX_FILE_RE.replace(rel_path, "");
    EXTENSION_RE.replace(&slug, "").into_owned()
}
