//! Page extraction: title, outgoing links, and categorized assets
//!
//! Extraction never fails. Malformed markup parses to whatever the HTML5
//! algorithm recovers, and a missing element yields an empty result for that
//! field. Outgoing links are resolved to absolute form against the request
//! URL; asset references keep their raw attribute values.

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

/// Asset URLs grouped by category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMap {
    pub images: Vec<String>,
    pub styles: Vec<String>,
    pub scripts: Vec<String>,
    pub video: Vec<String>,
    pub audio: Vec<String>,
}

/// Everything extracted from one fetched document
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    /// Text of the first `<title>`, empty when absent
    pub title: String,

    /// `<a href>` targets resolved to absolute URLs
    pub links: Vec<String>,

    /// Asset references by category, unresolved
    pub assets: AssetMap,
}

/// Extracts title, links, and assets from an HTML document
pub fn extract(html: &str, base_url: &Url) -> ExtractedPage {
    let document = Html::parse_document(html);

    ExtractedPage {
        title: extract_title(&document),
        links: extract_links(&document, base_url),
        assets: extract_assets(&document),
    }
}

fn extract_title(document: &Html) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute) = resolve_link(href, base_url) {
                    links.push(absolute);
                }
            }
        }
    }

    links
}

/// Resolves an href to an absolute URL, or drops it
///
/// Skipped: empty hrefs, `javascript:`/`mailto:`/`tel:`/`data:` schemes,
/// fragment-only anchors, and anything that does not resolve to HTTP(S).
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute) if matches!(absolute.scheme(), "http" | "https") => {
            Some(absolute.to_string())
        }
        _ => None,
    }
}

fn extract_assets(document: &Html) -> AssetMap {
    AssetMap {
        images: collect_attr(document, "img", "src"),
        // Every <link> href counts as a style reference
        styles: collect_attr(document, "link", "href"),
        scripts: collect_attr(document, "script", "src"),
        video: collect_video(document),
        audio: collect_audio(document),
    }
}

fn collect_attr(document: &Html, element: &str, attr: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(element) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|node| node.value().attr(attr))
        .map(str::to_string)
        .collect()
}

fn collect_video(document: &Html) -> Vec<String> {
    let Ok(video_selector) = Selector::parse("video") else {
        return Vec::new();
    };

    let mut video = Vec::new();
    for element in document.select(&video_selector) {
        if let Some(src) = element.value().attr("src") {
            video.push(src.to_string());
        }
        if let Some(poster) = element.value().attr("poster") {
            video.push(poster.to_string());
        }
        collect_nested_src(&element, "kind, source", &mut video);
    }

    video
}

fn collect_audio(document: &Html) -> Vec<String> {
    let Ok(audio_selector) = Selector::parse("audio") else {
        return Vec::new();
    };

    let mut audio = Vec::new();
    for element in document.select(&audio_selector) {
        if let Some(src) = element.value().attr("src") {
            audio.push(src.to_string());
        }
        collect_nested_src(&element, "source", &mut audio);
    }

    audio
}

fn collect_nested_src(element: &ElementRef, selector: &str, out: &mut Vec<String>) {
    if let Ok(nested) = Selector::parse(selector) {
        for child in element.select(&nested) {
            if let Some(src) = child.value().attr("src") {
                out.push(src.to_string());
            }
        }
    }
}
