use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::ids::WorkId;
use crate::record::WorkRecord;

static TITLE: LazyLock<Selector> = LazyLock::new(|| parse_selector("h2.title"));
static BYLINE: LazyLock<Selector> = LazyLock::new(|| parse_selector("h3.byline"));
static SUMMARY: LazyLock<Selector> = LazyLock::new(|| parse_selector("div.summary blockquote"));
static RATING: LazyLock<Selector> = LazyLock::new(|| parse_selector("dd.rating"));
static FANDOM: LazyLock<Selector> = LazyLock::new(|| parse_selector("dd.fandom"));
static LINK: LazyLock<Selector> = LazyLock::new(|| parse_selector("a"));

fn parse_selector(selector: &str) -> Selector {
    Selector::parse(selector).expect("valid selector")
}

pub struct WorkPage {
    document: Html,
}

impl WorkPage {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    pub fn title(&self) -> Option<String> {
        first_text(self.first(&TITLE)?)
    }

    pub fn author(&self) -> Option<String> {
        let byline = self.first(&BYLINE)?;
        let child = byline.children().filter_map(ElementRef::wrap).next()?;
        first_text(child)
    }

    // Inner HTML, markup preserved.
    pub fn summary(&self) -> Option<String> {
        let blockquote = self.first(&SUMMARY)?;
        Some(blockquote.inner_html().trim().to_owned())
    }

    pub fn rating(&self) -> Vec<String> {
        self.tag_list(&RATING)
    }

    pub fn fandoms(&self) -> Vec<String> {
        self.tag_list(&FANDOM)
    }

    fn first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.document.select(selector).next()
    }

    fn tag_list(&self, selector: &Selector) -> Vec<String> {
        let Some(dd) = self.first(selector) else {
            return Vec::new();
        };

        let links: Vec<String> = dd.select(&LINK).filter_map(first_text).collect();
        if !links.is_empty() {
            return links;
        }

        let text = dd.text().collect::<String>();
        let text = text.trim();
        if text.is_empty() {
            Vec::new()
        } else {
            vec![text.to_owned()]
        }
    }
}

fn first_text(element: ElementRef<'_>) -> Option<String> {
    element
        .text()
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_owned)
}

pub fn extract(page: &WorkPage, id: &WorkId, url: &Url) -> WorkRecord {
    WorkRecord {
        id: id.clone(),
        title: page.title().unwrap_or_default(),
        author: page.author().unwrap_or_default(),
        summary: page.summary().unwrap_or_default(),
        rating: page.rating(),
        fandoms: page.fandoms(),
        url: url.to_string(),
    }
}
