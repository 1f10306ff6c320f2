use once_cell::sync::Lazy;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use super::base;
use crate::error::{Error, Result};

static NEXT_PAGE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        "body > article > div > div.container.paginator > div > div > \
         div.pagination-arrow.pagination-arrow-next.text-right > li > a",
    )
    .expect("event finder pagination selector")
});
static EVENT_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("body > article > div > div.event").expect("event finder card selector")
});
static HEADING_BOX_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.text-lg-left").expect("event finder heading box"));
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h2").expect("event finder title"));
static PARAGRAPH_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p").expect("event finder paragraph"));

/// One fetched result page of the event finder.
pub struct ListingPage {
    document: Html,
}

/// The three text regions of a listing entry, before any interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEventBlock {
    pub page: u32,
    pub index: usize,
    pub title: String,
    pub date_format: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TitleFields {
    pub event_type: String,
    pub venue_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DateFormatFields {
    pub raw_datetime: String,
    pub format: String,
}

impl ListingPage {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// Reads the highest page index from the "next" arrow. A listing that fits
    /// on one page has no arrow at all.
    pub fn page_count(&self, listing_url: &str) -> Result<u32> {
        let link = match self.document.select(&NEXT_PAGE_SELECTOR).next() {
            Some(link) => link,
            None => return Ok(1),
        };
        let href = link
            .value()
            .attr("href")
            .ok_or_else(|| Error::structure("pagination link has no href"))?;
        let resolved = Url::parse(listing_url)
            .and_then(|base| base.join(href))
            .map_err(|err| Error::structure(format!("pagination href {href:?}: {err}")))?;
        let page = resolved
            .query_pairs()
            .filter(|(key, _)| key == "page")
            .map(|(_, value)| value.into_owned())
            .last()
            .ok_or_else(|| Error::structure(format!("pagination href {href:?} has no page")))?;

        match page.trim().parse::<u32>() {
            Ok(count) if count > 0 => Ok(count),
            _ => Err(Error::structure(format!(
                "pagination href {href:?} has invalid page {page:?}"
            ))),
        }
    }

    /// `page` is the 1-based page number, carried into every block for diagnostics.
    pub fn blocks(&self, page: u32) -> impl Iterator<Item = Result<RawEventBlock>> + '_ {
        self.document
            .select(&EVENT_SELECTOR)
            .enumerate()
            .map(move |(index, card)| extract_block(page, index, card))
    }
}

fn extract_block(page: u32, index: usize, card: ElementRef<'_>) -> Result<RawEventBlock> {
    let missing =
        |part: &str| Error::structure(format!("page {page} event #{index}: missing {part}"));

    let heading_box = base::nth(&card, &HEADING_BOX_SELECTOR, 0)
        .ok_or_else(|| missing("div.text-lg-left"))?;
    let title = base::nth(&heading_box, &TITLE_SELECTOR, 0).ok_or_else(|| missing("h2"))?;
    let date_format =
        base::nth(&card, &PARAGRAPH_SELECTOR, 0).ok_or_else(|| missing("date paragraph"))?;
    let location =
        base::nth(&card, &PARAGRAPH_SELECTOR, 1).ok_or_else(|| missing("location paragraph"))?;

    Ok(RawEventBlock {
        page,
        index,
        title: base::raw_text(title),
        date_format: base::raw_text(date_format),
        location: base::raw_text(location).trim().to_string(),
    })
}

impl RawEventBlock {
    pub fn title_fields(&self) -> Result<TitleFields> {
        TitleFields::from_region(&self.title).map_err(|err| self.locate(err))
    }

    pub fn date_format_fields(&self) -> Result<DateFormatFields> {
        DateFormatFields::from_region(&self.date_format).map_err(|err| self.locate(err))
    }

    fn locate(&self, err: Error) -> Error {
        match err {
            Error::Structure(message) => Error::structure(format!(
                "page {} event #{}: {message}",
                self.page, self.index
            )),
            other => other,
        }
    }
}

impl TitleFields {
    /// Line 1 is the event type, line 3 the hosting store.
    pub fn from_region(text: &str) -> Result<Self> {
        let pieces = base::segments(text, 4, "title")?;
        Self::from_segments(&pieces)
    }

    pub fn from_segments<S: AsRef<str>>(pieces: &[S]) -> Result<Self> {
        match pieces {
            [_, event_type, _, venue_name, ..] => Ok(Self {
                event_type: event_type.as_ref().trim().to_string(),
                venue_name: venue_name.as_ref().trim().to_string(),
            }),
            _ => Err(Error::structure(format!(
                "title has {} segment(s), expected 4",
                pieces.len()
            ))),
        }
    }
}

impl DateFormatFields {
    /// Line 0 is the date and time, line 2 the game format.
    pub fn from_region(text: &str) -> Result<Self> {
        let pieces = base::segments(text, 3, "date/format")?;
        Ok(Self {
            raw_datetime: pieces[0].clone(),
            format: pieces[2].clone(),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const LISTING_URL: &str = "https://fabtcg.com/ja/events/";

    pub(crate) fn event_card(
        event_type: &str,
        store: &str,
        when: &str,
        format: &str,
        address: &str,
    ) -> String {
        format!(
            r#"
        <div class="event">
            <div class="row">
                <div class="col text-lg-left">
                    <h2><span class="badge">Event</span>
<span class="type">{event_type}</span>
<span class="sep">@</span>
<span class="store">{store}</span>
</h2>
                </div>
            </div>
            <p>
                {when}
                <br>
                {format}
            </p>
            <p>
                {address}
            </p>
        </div>"#
        )
    }

    pub(crate) fn listing_page(cards: &[String], last_page: Option<u32>) -> String {
        let paginator = last_page
            .map(|page| {
                format!(
                    r#"
        <div class="container paginator">
            <div><div>
                <div class="pagination-arrow pagination-arrow-next text-right">
                    <li><a href="?format=&amp;type=&amp;distance=50&amp;query=Tokyo&amp;sort=date&amp;mode=event&amp;page={page}">&raquo;</a></li>
                </div>
            </div></div>
        </div>"#
                )
            })
            .unwrap_or_default();
        format!(
            r#"<!DOCTYPE html>
<html><head><title>Events</title></head>
<body>
    <article>
        <div>
            {}
            {paginator}
        </div>
    </article>
</body></html>"#,
            cards.join("\n")
        )
    }

    #[test]
    fn reads_page_count_from_next_arrow() {
        let html = listing_page(&[], Some(7));
        let page = ListingPage::parse(&html);
        assert_eq!(page.page_count(LISTING_URL).expect("page count"), 7);
    }

    #[test]
    fn missing_next_arrow_means_single_page() {
        let html = listing_page(&[], None);
        let page = ListingPage::parse(&html);
        assert_eq!(page.page_count(LISTING_URL).expect("page count"), 1);
    }

    #[test]
    fn rejects_non_numeric_page_index() {
        let html = listing_page(&[], Some(3)).replace("page=3", "page=last");
        let page = ListingPage::parse(&html);
        assert!(matches!(
            page.page_count(LISTING_URL),
            Err(Error::Structure(_))
        ));
    }

    #[test]
    fn extracts_blocks_in_listing_order() {
        let html = listing_page(
            &[
                event_card(
                    "Armory",
                    "Yodobashi Store",
                    "Sun 21st Sep, 3:30 PM",
                    "Classic Constructed",
                    "Shinagawa, Tokyo",
                ),
                event_card(
                    "Skirmish",
                    "Card Shop Meguro",
                    "Mon 22nd Sep, 7 PM",
                    "Blitz",
                    "Meguro, Tokyo",
                ),
            ],
            Some(2),
        );
        let page = ListingPage::parse(&html);
        let blocks = page
            .blocks(4)
            .collect::<Result<Vec<_>>>()
            .expect("blocks");
        assert_eq!(blocks.len(), 2);
        assert_eq!((blocks[0].page, blocks[0].index), (4, 0));
        assert_eq!((blocks[1].page, blocks[1].index), (4, 1));
        assert_eq!(blocks[0].location, "Shinagawa, Tokyo");

        let title = TitleFields::from_region(&blocks[0].title).expect("title fields");
        assert_eq!(title.event_type, "Armory");
        assert_eq!(title.venue_name, "Yodobashi Store");

        let date = DateFormatFields::from_region(&blocks[1].date_format).expect("date fields");
        assert_eq!(date.raw_datetime, "Mon 22nd Sep, 7 PM");
        assert_eq!(date.format, "Blitz");
    }

    #[test]
    fn title_segments_by_position() {
        let fields =
            TitleFields::from_segments(&["", "Armory", "", "Yodobashi Store"]).expect("fields");
        assert_eq!(fields.event_type, "Armory");
        assert_eq!(fields.venue_name, "Yodobashi Store");
    }

    #[test]
    fn short_title_is_a_structure_error() {
        assert!(matches!(
            TitleFields::from_segments(&["Armory", "Yodobashi Store"]),
            Err(Error::Structure(_))
        ));
        assert!(matches!(
            TitleFields::from_region("Armory\nYodobashi Store"),
            Err(Error::Structure(_))
        ));
    }

    #[test]
    fn card_without_location_is_a_structure_error() {
        let card = event_card("Armory", "Store", "Sun 21st Sep, 3 PM", "Blitz", "Tokyo")
            .replacen("<p>", "<span>", 2)
            .replacen("</p>", "</span>", 2);
        let html = listing_page(&[card], None);
        let page = ListingPage::parse(&html);
        let first = page.blocks(1).next().expect("one card");
        assert!(matches!(
            first,
            Err(Error::Structure(message))
                if message.contains("page 1 event #0") && message.contains("paragraph")
        ));
    }

    #[test]
    fn short_date_region_names_page_and_event() {
        // no format line: the region collapses to the date alone
        let card = event_card("Armory", "Store", "Sun 21st Sep, 3 PM", "", "Tokyo");
        let html = listing_page(&[card.clone(), card], None);
        let page = ListingPage::parse(&html);
        let second = page
            .blocks(3)
            .nth(1)
            .expect("two cards")
            .expect("block structure");
        let err = second.date_format_fields().expect_err("date region has two lines");
        assert!(matches!(
            err,
            Error::Structure(message)
                if message.contains("page 3 event #1") && message.contains("date/format")
        ));
    }
}
