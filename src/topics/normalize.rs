// Text normalizer: the per-headline cleaning transform.
//
// Steps, in order: lower-case, strip `http...` runs, strip ASCII punctuation,
// strip decimal digits. Both patterns are Unicode-aware: a URL ends at any
// whitespace (including U+00A0 and U+3000), and `\d` matches decimal digits
// in every script but leaves superscripts, fractions and Roman numerals.
// Removing punctuation and digits can glue a URL back together
// ("ht.tp//x" -> "httpx"), so the URL pattern is swept once more at the end.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::news::records::Record;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"http\S+").expect("URL pattern is a valid regex"));

static DIGIT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d").expect("digit pattern is a valid regex"));

/// Clean a single headline.
pub fn clean_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let without_urls = URL_PATTERN.replace_all(&lowered, "");

    let without_punctuation: String = without_urls
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();
    let without_digits = DIGIT_PATTERN.replace_all(&without_punctuation, "");

    URL_PATTERN.replace_all(&without_digits, "").into_owned()
}

/// Clean a record's headline, degrading to an empty string when the
/// headline isn't text.
pub fn clean_record(record: &Record) -> String {
    match record.headline.as_deref() {
        Some(text) => clean_text(text),
        None => {
            warn!(ticker = %record.ticker, "Headline is not text, using empty document");
            String::new()
        }
    }
}

/// Clean every record's headline, one document per record, in order.
pub fn clean_headlines(records: &[Record]) -> Vec<String> {
    records.iter().map(clean_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_headline() {
        assert_eq!(
            clean_text("Apple Surges 10% on http://example.com news!"),
            "apple surges  on  news"
        );
    }

    #[test]
    fn test_reassembled_url_is_removed() {
        assert_eq!(clean_text("see ht.tp://x now"), "see  now");
    }

    #[test]
    fn test_url_stops_at_unicode_whitespace() {
        assert_eq!(
            clean_text("Read http://x.co/a\u{00a0}Apple beats estimates"),
            "read \u{00a0}apple beats estimates"
        );
        assert_eq!(
            clean_text("http://x.co\u{3000}Nvidia"),
            "\u{3000}nvidia"
        );
    }

    #[test]
    fn test_only_decimal_digits_are_removed() {
        assert_eq!(clean_text("Q² revenue up ½"), "q² revenue up ½");
        // Arabic-Indic digits are decimal digits too
        assert_eq!(clean_text("eps \u{0663}\u{0664} beat"), "eps  beat");
    }

    #[test]
    fn test_non_text_headline_degrades() {
        let record = Record {
            headline: None,
            ticker: "AAPL".to_string(),
            published: None,
            publisher: None,
        };
        assert_eq!(clean_record(&record), "");
    }

    #[test]
    fn test_clean_headlines_keeps_alignment() {
        let records = vec![
            Record::new("First!", "AAPL"),
            Record {
                headline: None,
                ticker: "AAPL".to_string(),
                published: None,
                publisher: None,
            },
            Record::new("Third 3rd", "AAPL"),
        ];
        assert_eq!(clean_headlines(&records), vec!["first", "", "third rd"]);
    }
}
