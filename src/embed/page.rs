//! HTML rendering for link previews.
//!
//! # Design Decisions
//! - Every interpolated value is attribute/text escaped
//! - `meta refresh` sends anything that does render the page on to the chapter
//! - No `og:image` when the chapter has no pages

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::embed::chapter::Chapter;

pub const SITE_NAME: &str = "Dynasty Scans Embedded";

/// Render the preview page for `chapter`, which lives at `location`.
pub fn render(chapter: &Chapter, origin_base: &str, location: &str) -> String {
    let title = &chapter.long_title;
    let description = chapter.description();
    let location_attr = encode_double_quoted_attribute(location);

    let mut html = String::with_capacity(512);
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str(&format!("    <title>{}</title>\n", encode_text(title)));
    html.push_str(&format!(
        "    <meta http-equiv=\"refresh\" content=\"0; url={location_attr}\">\n"
    ));
    push_meta(&mut html, "og:title", title);
    push_meta(&mut html, "og:site_name", SITE_NAME);
    push_meta(&mut html, "og:description", &description);
    if let Some(cover) = chapter.cover() {
        push_meta(&mut html, "og:image", &format!("{origin_base}{cover}"));
    }
    push_meta(&mut html, "og:url", location);
    html.push_str("</head>\n<body>\n</body>\n</html>\n");
    html
}

fn push_meta(html: &mut String, property: &str, content: &str) {
    html.push_str(&format!(
        "    <meta property=\"{property}\" content=\"{}\"/>\n",
        encode_double_quoted_attribute(content)
    ));
}
