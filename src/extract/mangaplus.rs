use chrono::NaiveDate;
use regex::Regex;
use scraper::{Html, Selector};

use crate::app::{Result, ShinkanError};
use crate::domain::Chapter;

pub const BASE_URL: &str = "https://mangaplus.shueisha.co.jp";

/// Release dates are rendered as `Jan 05, 2024`.
const DATE_FORMAT: &str = "%b %d, %Y";

/// How many chapters from the tail of the page to keep by default.
///
/// MangaPlus title pages list the full backlog; only the most recent few
/// rows are relevant for release notification.
pub const DEFAULT_TAIL: usize = 3;

/// Extract the last `tail` chapter rows of a MangaPlus title page, in page
/// order. The read URL is rebuilt from the 7-digit chapter id embedded in
/// the row's thumbnail `data-src`.
pub fn extract(work_title: &str, html: &str, tail: usize) -> Result<Vec<Chapter>> {
    let document = Html::parse_document(html);

    let main = Selector::parse(".TitleDetail-module_main_19fsJ").unwrap();
    let row = Selector::parse(".ChapterListItem-module_chapterListItem_ykICp").unwrap();
    let name = Selector::parse(".ChapterListItem-module_title_3Id89").unwrap();
    let date = Selector::parse(".ChapterListItem-module_date_xe1XF").unwrap();
    let thumb = Selector::parse("img").unwrap();
    let chapter_id = Regex::new(r"/chapter/(\d{7})/").unwrap();

    let main = document
        .select(&main)
        .next()
        .ok_or_else(|| malformed(work_title, "title detail container not found"))?;

    let rows: Vec<_> = main.select(&row).collect();
    let skip = rows.len().saturating_sub(tail);

    let mut chapters = Vec::new();
    for chapter_row in &rows[skip..] {
        let title = chapter_row
            .select(&name)
            .next()
            .map(|el| el.text().collect::<String>())
            .ok_or_else(|| malformed(work_title, "chapter row without a title element"))?;

        let date_text = chapter_row
            .select(&date)
            .next()
            .map(|el| el.text().collect::<String>())
            .ok_or_else(|| malformed(work_title, "chapter row without a release date"))?;

        let release_date = NaiveDate::parse_from_str(&date_text, DATE_FORMAT)
            .map_err(|e| malformed(work_title, format!("bad date {date_text:?}: {e}")))?
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| malformed(work_title, "date out of range"))?
            .and_utc();

        let data_src = chapter_row
            .select(&thumb)
            .next()
            .and_then(|el| el.value().attr("data-src"))
            .ok_or_else(|| malformed(work_title, "chapter row without a thumbnail"))?;

        let id = chapter_id
            .captures(data_src)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| {
                malformed(work_title, format!("no chapter id in thumbnail {data_src:?}"))
            })?;

        chapters.push(Chapter::new(
            work_title,
            title,
            format!("{BASE_URL}/viewer/{id}"),
            release_date,
        ));
    }

    Ok(chapters)
}

fn malformed(work: &str, reason: impl Into<String>) -> ShinkanError {
    ShinkanError::MalformedContent {
        work: work.to_string(),
        reason: reason.into(),
    }
}
