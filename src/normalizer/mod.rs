pub mod date;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::app::{FeedDigestError, Result};
use crate::domain::Entry;

pub use date::parse_pub_date;

/// Channel title plus the entries of a feed, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub entries: Vec<Entry>,
}

/// Item fields as read from the document, before validation.
#[derive(Debug, Default)]
struct RawItem {
    title: String,
    link: String,
    description: String,
    pub_date: Option<String>,
}

impl RawItem {
    fn field_mut(&mut self, name: &[u8]) -> Option<&mut String> {
        match name {
            b"title" => Some(&mut self.title),
            b"link" => Some(&mut self.link),
            b"description" => Some(&mut self.description),
            b"pubDate" => Some(self.pub_date.get_or_insert_with(String::new)),
            _ => None,
        }
    }

    /// `Ok(None)` for items without a link; an unparseable or missing
    /// `pubDate` on a linked item fails the whole feed.
    fn into_entry(self) -> Result<Option<Entry>> {
        let link = self.link.trim();
        if link.is_empty() {
            return Ok(None);
        }

        let raw_date = self.pub_date.unwrap_or_default();
        let published = parse_pub_date(&raw_date)?;
        Ok(Some(Entry::new(
            self.title.trim(),
            link,
            self.description,
            &published,
        )))
    }
}

/// Where the reader currently is, relative to the RSS channel.
enum Position<'a> {
    ChannelTitle,
    ItemField(&'a [u8]),
    Other,
}

fn position(stack: &[Vec<u8>]) -> Position<'_> {
    match stack {
        [_, channel, title] if channel == b"channel" && title == b"title" => {
            Position::ChannelTitle
        }
        [_, channel, item, field] if channel == b"channel" && item == b"item" => {
            Position::ItemField(field.as_slice())
        }
        _ => Position::Other,
    }
}

fn is_item(stack: &[Vec<u8>]) -> bool {
    matches!(stack, [_, channel, item] if channel == b"channel" && item == b"item")
}

/// Parses RSS 2.0 documents into [`Entry`] values.
#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Entries of the feed in document order.
    pub fn parse(&self, body: &[u8]) -> Result<Vec<Entry>> {
        self.parse_feed(body).map(|feed| feed.entries)
    }

    pub fn parse_feed(&self, body: &[u8]) -> Result<ParsedFeed> {
        let mut reader = Reader::from_reader(body);
        reader.config_mut().check_end_names = true;

        let mut feed = ParsedFeed::default();
        let mut channel_title: Option<String> = None;
        let mut stack: Vec<Vec<u8>> = Vec::new();
        let mut saw_root = false;
        let mut item: Option<RawItem> = None;
        let mut buf = Vec::new();

        loop {
            let event = reader.read_event_into(&mut buf).map_err(|e| {
                FeedDigestError::FeedParse(format!(
                    "XML error at position {}: {}",
                    reader.buffer_position(),
                    e
                ))
            })?;

            match event {
                Event::Start(e) => {
                    if stack.is_empty() && saw_root {
                        break;
                    }
                    saw_root = true;
                    stack.push(e.name().as_ref().to_vec());

                    if is_item(&stack) {
                        item = Some(RawItem::default());
                    } else {
                        match position(&stack) {
                            Position::ChannelTitle => channel_title = Some(String::new()),
                            Position::ItemField(name) => {
                                if let Some(field) = item.as_mut().and_then(|i| i.field_mut(name)) {
                                    field.clear();
                                }
                            }
                            Position::Other => {}
                        }
                    }
                }
                Event::Empty(e) => {
                    if stack.is_empty() {
                        saw_root = true;
                        break;
                    }
                    // `<item/>` has no link and is skipped; `<link/>` empties the field.
                    stack.push(e.name().as_ref().to_vec());
                    if let Position::ItemField(name) = position(&stack) {
                        if let Some(field) = item.as_mut().and_then(|i| i.field_mut(name)) {
                            field.clear();
                        }
                    }
                    stack.pop();
                }
                Event::End(_) => {
                    if is_item(&stack) {
                        if let Some(raw) = item.take() {
                            if let Some(entry) = raw.into_entry()? {
                                feed.entries.push(entry);
                            }
                        }
                    }
                    if stack.pop().is_none() {
                        return Err(FeedDigestError::FeedParse(
                            "unexpected closing tag".into(),
                        ));
                    }
                }
                Event::Text(e) => {
                    let text = e
                        .unescape()
                        .map_err(|e| FeedDigestError::FeedParse(e.to_string()))?;
                    append_text(&stack, &mut item, &mut channel_title, &text);
                }
                Event::CData(e) => {
                    let raw = e.into_inner();
                    let text = String::from_utf8_lossy(&raw);
                    append_text(&stack, &mut item, &mut channel_title, &text);
                }
                Event::Eof => break,
                _ => {}
            }

            buf.clear();
        }

        if !saw_root {
            return Err(FeedDigestError::FeedParse("document has no root element".into()));
        }
        if !stack.is_empty() {
            return Err(FeedDigestError::FeedParse(format!(
                "unexpected end of document inside <{}>",
                String::from_utf8_lossy(stack.last().map(Vec::as_slice).unwrap_or_default())
            )));
        }

        feed.title = channel_title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        tracing::debug!(entries = feed.entries.len(), "Parsed feed");
        Ok(feed)
    }
}

fn append_text(
    stack: &[Vec<u8>],
    item: &mut Option<RawItem>,
    channel_title: &mut Option<String>,
    text: &str,
) {
    match position(stack) {
        Position::ChannelTitle => {
            if let Some(title) = channel_title.as_mut() {
                title.push_str(text);
            }
        }
        Position::ItemField(name) => {
            if let Some(field) = item.as_mut().and_then(|i| i.field_mut(name)) {
                field.push_str(text);
            }
        }
        Position::Other => {}
    }
}
