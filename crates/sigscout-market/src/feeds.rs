//! Syndication feed fetching and parsing.

use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;

use crate::error::MarketError;

/// One `<item>` extracted from an RSS feed.
#[derive(Debug, Clone)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub description: String,
    pub published_at: Option<DateTime<Utc>>,
}

/// Fetch a feed URL and parse its items.
///
/// # Errors
///
/// Returns [`MarketError::Http`] on network failure or non-2xx status, or
/// [`MarketError::Xml`] on malformed XML.
pub async fn fetch_feed(client: &Client, url: &str) -> Result<Vec<FeedItem>, MarketError> {
    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    parse_feed(&body)
}

/// Parse an RSS feed body into [`FeedItem`]s.
///
/// Items without a link are dropped. `pubDate` values are parsed as
/// RFC 2822 with an RFC 3339 fallback; unparseable dates yield `None`.
///
/// # Errors
///
/// Returns [`MarketError::Xml`] if the XML is malformed.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedItem>, MarketError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut title = String::new();
    let mut link = String::new();
    let mut description = String::new();
    let mut pub_date = String::new();
    let mut in_item = false;
    let mut current_tag = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = std::str::from_utf8(e.name().as_ref())
                    .unwrap_or("")
                    .to_string();
                if name == "item" {
                    in_item = true;
                    title.clear();
                    link.clear();
                    description.clear();
                    pub_date.clear();
                } else {
                    current_tag = name;
                }
            }
            Ok(Event::End(e)) => {
                let raw = e.name();
                let name = std::str::from_utf8(raw.as_ref()).unwrap_or("");
                if name == "item" && in_item {
                    in_item = false;
                    if !link.is_empty() {
                        items.push(FeedItem {
                            title: title.clone(),
                            link: link.clone(),
                            description: description.clone(),
                            published_at: parse_pub_date(&pub_date),
                        });
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if in_item {
                    let text = e.unescape().unwrap_or_default().into_owned();
                    assign_field(&current_tag, text, &mut title, &mut link, &mut description, &mut pub_date);
                }
            }
            Ok(Event::CData(e)) => {
                if in_item {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    assign_field(&current_tag, text, &mut title, &mut link, &mut description, &mut pub_date);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(MarketError::Xml(e)),
            _ => {}
        }
    }

    Ok(items)
}

fn assign_field(
    tag: &str,
    text: String,
    title: &mut String,
    link: &mut String,
    description: &mut String,
    pub_date: &mut String,
) {
    match tag {
        "title" => *title = text,
        "link" => *link = text,
        "description" => *description = strip_html(&text),
        "pubDate" => *pub_date = text,
        _ => {}
    }
}

fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Strip HTML tags from a string, returning plain text.
fn strip_html(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }
    result.trim().to_string()
}
