// src/render/rss.rs

//! RSS 2.0 feed.

use crate::models::{NormalizedPost, RssConfig, SiteConfig};
use crate::utils::text::truncate;
use crate::utils::xml::{cdata, escape};

/// Path of the feed relative to the site origin.
pub const FEED_PATH: &str = "/rss.xml";

/// Render `posts` (already ordered and limited) as an RSS 2.0 channel.
pub fn render_feed(site: &SiteConfig, rss: &RssConfig, posts: &[NormalizedPost]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<rss version=\"2.0\" xmlns:atom=\"http://www.w3.org/2005/Atom\" xmlns:dc=\"http://purl.org/dc/elements/1.1/\">\n");
    xml.push_str("  <channel>\n");
    xml.push_str(&format!("    <title>{}</title>\n", cdata(&site.title)));
    xml.push_str(&format!("    <link>{}</link>\n", escape(&site.absolute("/"))));
    xml.push_str(&format!(
        "    <description>{}</description>\n",
        cdata(&site.description)
    ));
    xml.push_str(&format!(
        "    <atom:link href=\"{}\" rel=\"self\" type=\"application/rss+xml\"/>\n",
        escape(&site.absolute(FEED_PATH))
    ));
    if let Some(newest) = posts.iter().map(|p| p.date).max() {
        xml.push_str(&format!(
            "    <lastBuildDate>{}</lastBuildDate>\n",
            newest.to_rfc2822()
        ));
    }

    for post in posts {
        let link = site.absolute(&post.url);
        xml.push_str("    <item>\n");
        xml.push_str(&format!("      <title>{}</title>\n", cdata(&post.title)));
        xml.push_str(&format!("      <link>{}</link>\n", escape(&link)));
        xml.push_str(&format!(
            "      <guid isPermaLink=\"true\">{}</guid>\n",
            escape(&link)
        ));
        xml.push_str(&format!(
            "      <description>{}</description>\n",
            cdata(&truncate(&post.description, rss.description_length))
        ));
        xml.push_str(&format!("      <pubDate>{}</pubDate>\n", post.date.to_rfc2822()));
        if let Some(author) = &post.author {
            xml.push_str(&format!("      <dc:creator>{}</dc:creator>\n", cdata(author)));
        }
        for category in &post.categories {
            xml.push_str(&format!("      <category>{}</category>\n", cdata(category)));
        }
        xml.push_str("    </item>\n");
    }

    xml.push_str("  </channel>\n");
    xml.push_str("</rss>\n");
    xml
}
