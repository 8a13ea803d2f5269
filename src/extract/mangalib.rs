use chrono::NaiveDate;
use scraper::{Html, Selector};

use crate::app::{Result, ShinkanError};
use crate::domain::Chapter;

pub const BASE_URL: &str = "https://mangalib.me";

/// Release dates are rendered as `05.01.2024`.
const DATE_FORMAT: &str = "%d.%m.%Y";

/// Extract every chapter row visible on a MangaLib title page, in page order.
pub fn extract(work_title: &str, html: &str) -> Result<Vec<Chapter>> {
    let document = Html::parse_document(html);

    let row = Selector::parse("div.vue-recycle-scroller__item-view").unwrap();
    let name = Selector::parse("div.media-chapter__name.text-truncate").unwrap();
    let link = Selector::parse("a.link-default").unwrap();
    let date = Selector::parse("div.media-chapter__date").unwrap();

    let mut chapters = Vec::new();
    for chapter_row in document.select(&row) {
        let title = chapter_row
            .select(&name)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .ok_or_else(|| malformed(work_title, "chapter row without a name element"))?;

        let href = chapter_row
            .select(&link)
            .next()
            .and_then(|el| el.value().attr("href"))
            .ok_or_else(|| malformed(work_title, "chapter row without a link"))?;

        let date_text = chapter_row
            .select(&date)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .ok_or_else(|| malformed(work_title, "chapter row without a release date"))?;

        let release_date = NaiveDate::parse_from_str(&date_text, DATE_FORMAT)
            .map_err(|e| malformed(work_title, format!("bad date {date_text:?}: {e}")))?
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| malformed(work_title, "date out of range"))?
            .and_utc();

        chapters.push(Chapter::new(
            work_title,
            title,
            format!("{BASE_URL}{href}"),
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Utc};

    fn row(name: &str, href: &str, date: &str) -> String {
        format!(
            r#"<div class="vue-recycle-scroller__item-view">
                 <div class="media-chapter">
                   <a class="link-default" href="{href}">
                     <div class="media-chapter__name text-truncate"> {name} </div>
                   </a>
                   <div class="media-chapter__date">{date}</div>
                 </div>
               </div>"#
        )
    }

    fn page(rows: &[String]) -> String {
        format!("<html><body>{}</body></html>", rows.join("\n"))
    }

    #[test]
    fn test_extract_chapters_in_page_order() {
        let html = page(&[
            row("Том 1 Глава 2", "/one-piece/v1/c2", "12.03.2024"),
            row("Том 1 Глава 1", "/one-piece/v1/c1", "05.03.2024"),
        ]);

        let chapters = extract("One Piece", &html).unwrap();
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].title, "Том 1 Глава 2");
        assert_eq!(chapters[1].title, "Том 1 Глава 1");
        assert_eq!(chapters[0].url, "https://mangalib.me/one-piece/v1/c2");
        assert_eq!(
            chapters[0].release_date,
            Utc.with_ymd_and_hms(2024, 3, 12, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_extracted_chapters_are_unread_and_unpersisted() {
        let html = page(&[row("Глава 1", "/w/v1/c1", "01.01.2024")]);
        let chapters = extract("W", &html).unwrap();
        assert!(chapters.iter().all(|c| !c.is_read && c.id.is_none()));
        assert!(chapters.iter().all(|c| c.work_title == "W"));
    }

    #[test]
    fn test_title_is_trimmed() {
        let html = page(&[row("  Глава 1  ", "/w/v1/c1", "01.01.2024")]);
        let chapters = extract("W", &html).unwrap();
        assert_eq!(chapters[0].title, "Глава 1");
    }

    #[test]
    fn test_day_month_year_format() {
        let html = page(&[row("Глава 1", "/w/v1/c1", "02.03.2024")]);
        let chapters = extract("W", &html).unwrap();
        // 02.03.2024 is March 2nd, not February 3rd
        assert_eq!(chapters[0].release_date.day(), 2);
        assert_eq!(chapters[0].release_date.month(), 3);
    }

    #[test]
    fn test_malformed_date_is_fatal() {
        let html = page(&[row("Глава 1", "/w/v1/c1", "yesterday")]);
        let err = extract("W", &html).unwrap_err();
        assert!(matches!(
            err,
            ShinkanError::MalformedContent { ref work, .. } if work == "W"
        ));
    }

    #[test]
    fn test_missing_link_is_fatal() {
        let html = r#"<div class="vue-recycle-scroller__item-view">
            <div class="media-chapter__name text-truncate">Глава 1</div>
            <div class="media-chapter__date">01.01.2024</div>
        </div>"#;
        assert!(extract("W", html).is_err());
    }

    #[test]
    fn test_empty_page_yields_no_chapters() {
        let chapters = extract("W", "<html><body></body></html>").unwrap();
        assert!(chapters.is_empty());
    }
}
