// src/render/sitemap.rs

//! Sitemap index and `urlset` documents.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::models::{SiteConfig, SitemapEntry};
use crate::services::post_url;
use crate::utils::date::{parse_timestamp, w3c};
use crate::utils::xml::escape;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const IMAGE_NS: &str = "http://www.google.com/schemas/sitemap-image/1.1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Daily,
    Weekly,
    Monthly,
}

impl fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
        };
        f.write_str(s)
    }
}

/// One `<url>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlEntry {
    pub loc: String,
    pub lastmod: Option<String>,
    pub changefreq: Option<ChangeFreq>,
    pub priority: Option<f32>,
    pub image: Option<String>,
}

impl UrlEntry {
    pub fn new(loc: impl Into<String>) -> Self {
        Self {
            loc: loc.into(),
            lastmod: None,
            changefreq: None,
            priority: None,
            image: None,
        }
    }
}

/// A child sitemap reference in the index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub loc: String,
    pub lastmod: DateTime<Utc>,
}

/// Render a `<urlset>` document.
pub fn render_urlset(entries: &[UrlEntry]) -> String {
    let with_images = entries.iter().any(|e| e.image.is_some());

    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    if with_images {
        xml.push_str(&format!(
            "<urlset xmlns=\"{}\" xmlns:image=\"{}\">\n",
            SITEMAP_NS, IMAGE_NS
        ));
    } else {
        xml.push_str(&format!("<urlset xmlns=\"{}\">\n", SITEMAP_NS));
    }

    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape(&entry.loc)));
        if let Some(lastmod) = &entry.lastmod {
            xml.push_str(&format!("    <lastmod>{}</lastmod>\n", escape(lastmod)));
        }
        if let Some(changefreq) = entry.changefreq {
            xml.push_str(&format!("    <changefreq>{}</changefreq>\n", changefreq));
        }
        if let Some(priority) = entry.priority {
            xml.push_str(&format!("    <priority>{:.1}</priority>\n", priority));
        }
        if let Some(image) = &entry.image {
            xml.push_str(&format!(
                "    <image:image>\n      <image:loc>{}</image:loc>\n    </image:image>\n",
                escape(image)
            ));
        }
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Render a `<sitemapindex>` document.
pub fn render_index(children: &[IndexEntry]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!("<sitemapindex xmlns=\"{}\">\n", SITEMAP_NS));
    for child in children {
        xml.push_str(&format!(
            "  <sitemap>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n  </sitemap>\n",
            escape(&child.loc),
            w3c(&child.lastmod)
        ));
    }
    xml.push_str("</sitemapindex>\n");
    xml
}

/// Static pages: home and blog index.
pub fn static_entries(site: &SiteConfig, lastmod: Option<DateTime<Utc>>) -> Vec<UrlEntry> {
    let lastmod = lastmod.as_ref().map(w3c);
    vec![
        UrlEntry {
            loc: site.absolute("/"),
            lastmod: lastmod.clone(),
            changefreq: Some(ChangeFreq::Daily),
            priority: Some(1.0),
            image: None,
        },
        UrlEntry {
            loc: site.absolute(&site.blog_prefix),
            lastmod,
            changefreq: Some(ChangeFreq::Daily),
            priority: Some(0.9),
            image: None,
        },
    ]
}

/// Minimal valid sitemap used when the post count is unavailable.
pub fn homepage_only(site: &SiteConfig) -> String {
    let mut home = UrlEntry::new(site.absolute("/"));
    home.changefreq = Some(ChangeFreq::Daily);
    home.priority = Some(1.0);
    render_urlset(&[home])
}

/// `<url>` entries for remote post projections.
pub fn post_entries(site: &SiteConfig, entries: &[SitemapEntry]) -> Vec<UrlEntry> {
    entries
        .iter()
        .map(|entry| UrlEntry {
            loc: site.absolute(&post_url(&site.blog_prefix, &entry.slug)),
            lastmod: parse_timestamp(&entry.date).map(|d| w3c(&d)),
            changefreq: Some(ChangeFreq::Weekly),
            priority: Some(0.7),
            image: entry.image_url.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn site() -> SiteConfig {
        SiteConfig {
            url: "https://blog.test".into(),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn test_post_entries_escape_and_image() {
        let entries = post_entries(
            &site(),
            &[
                SitemapEntry {
                    slug: "tom-&-jerry".into(),
                    date: "2024-03-01T08:30:00".into(),
                    image_url: Some("https://cdn.test/a.png?w=1&h=2".into()),
                },
                SitemapEntry {
                    slug: "plain".into(),
                    date: String::new(),
                    image_url: None,
                },
            ],
        );
        assert_eq!(entries[0].loc, "https://blog.test/blog/tom-&-jerry");
        assert_eq!(entries[0].lastmod.as_deref(), Some("2024-03-01T08:30:00Z"));
        assert!(entries[1].lastmod.is_none());

        let xml = render_urlset(&entries);
        assert!(xml.contains("xmlns:image="));
        assert!(xml.contains("<loc>https://blog.test/blog/tom-&amp;-jerry</loc>"));
        assert!(xml.contains("<image:loc>https://cdn.test/a.png?w=1&amp;h=2</image:loc>"));
        assert!(xml.contains("<priority>0.7</priority>"));
        assert!(!xml.contains("tom-&-jerry"));
    }

    #[test]
    fn test_urlset_without_images_omits_namespace() {
        let xml = render_urlset(&static_entries(&site(), None));
        assert!(!xml.contains("xmlns:image"));
        assert!(xml.contains("<loc>https://blog.test/</loc>"));
        assert!(xml.contains("<loc>https://blog.test/blog/</loc>"));
        assert!(!xml.contains("<lastmod>"));
    }

    #[test]
    fn test_index() {
        let lastmod = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let xml = render_index(&[IndexEntry {
            loc: "https://blog.test/sitemap/posts-0.xml".into(),
            lastmod,
        }]);
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">"));
        assert!(xml.contains("<lastmod>2024-06-01T12:00:00Z</lastmod>"));
        assert!(xml.trim_end().ends_with("</sitemapindex>"));
    }

    #[test]
    fn test_homepage_only() {
        let xml = homepage_only(&site());
        assert_eq!(xml.matches("<url>").count(), 1);
        assert!(xml.contains("<changefreq>daily</changefreq>"));
        assert!(xml.contains("<priority>1.0</priority>"));
    }
}
