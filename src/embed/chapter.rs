//! Chapter metadata as served by the origin's `/chapters/{slug}.json`.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Chapter {
    pub long_title: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Tag {
    /// Category, e.g. "Doujin", "General", "Author", "Scanlator".
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Page {
    /// Origin-relative image path.
    pub url: String,
}

impl Chapter {
    /// Names of tags in `kind`, in document order.
    pub fn tags_of<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.tags
            .iter()
            .filter(move |t| t.kind == kind)
            .map(|t| t.name.as_str())
    }

    /// One-line summary built from the tag categories.
    pub fn description(&self) -> String {
        let doujins: Vec<&str> = self.tags_of("Doujin").collect();
        let general: Vec<&str> = self.tags_of("General").collect();
        let authors: Vec<&str> = self.tags_of("Author").collect();
        let scanlators: Vec<&str> = self.tags_of("Scanlator").collect();

        let mut parts = Vec::new();
        if !doujins.is_empty() {
            parts.push(format!("{} Doujin.", doujins.join(" and ")));
        }
        if !general.is_empty() {
            parts.push(format!("Tags: {}.", general.join(", ")));
        }
        if !authors.is_empty() {
            parts.push(format!("By {}.", authors.join(" and ")));
        }
        if !scanlators.is_empty() {
            parts.push(format!("Scanned by {}.", scanlators.join(" and ")));
        }
        parts.join(" ")
    }

    /// Path of the first page image, used as the preview.
    pub fn cover(&self) -> Option<&str> {
        self.pages.first().map(|p| p.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter() -> Chapter {
        serde_json::from_str(
            r#"{
                "long_title": "Citrus ch01",
                "tags": [
                    {"type": "General", "name": "Yuri"},
                    {"type": "Author", "name": "Saburouta"},
                    {"type": "General", "name": "School"},
                    {"type": "Scanlator", "name": "Alpha"},
                    {"type": "Scanlator", "name": "Beta"},
                    {"type": "Series", "name": "Citrus"}
                ],
                "pages": [{"url": "/system/releases/1/a.png", "name": "a"}],
                "added_on": "2013-01-01"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_description_order_and_joins() {
        assert_eq!(
            chapter().description(),
            "Tags: Yuri, School. By Saburouta. Scanned by Alpha and Beta."
        );
    }

    #[test]
    fn test_doujin_first() {
        let mut c = chapter();
        c.tags.push(Tag {
            kind: "Doujin".into(),
            name: "Touhou".into(),
        });
        assert!(c.description().starts_with("Touhou Doujin. Tags:"));
    }

    #[test]
    fn test_no_tags() {
        let c = Chapter {
            long_title: "x".into(),
            tags: vec![],
            pages: vec![],
        };
        assert_eq!(c.description(), "");
        assert_eq!(c.cover(), None);
    }

    #[test]
    fn test_cover_is_first_page() {
        assert_eq!(chapter().cover(), Some("/system/releases/1/a.png"));
    }
}
