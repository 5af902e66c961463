use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static WORK_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"works/(\d{4,})").expect("valid work-url pattern"));

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkId(String);

impl WorkId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// First match per line; deduplicated, ascending.
pub fn resolve_lines(text: &str) -> Vec<WorkId> {
    let mut ids = BTreeSet::new();
    for line in text.lines() {
        if let Some(caps) = WORK_URL.captures(line) {
            ids.insert(WorkId::new(&caps[1]));
        }
    }
    ids.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_ids_with_at_least_four_digits() {
        let ids = resolve_lines("https://archiveofourown.org/works/1234\n");
        assert_eq!(ids, vec![WorkId::new("1234")]);

        assert!(resolve_lines("https://archiveofourown.org/works/123\n").is_empty());
    }

    #[test]
    fn takes_first_match_per_line() {
        let ids = resolve_lines("see works/1111 and also works/2222\n");
        assert_eq!(ids, vec![WorkId::new("1111")]);
    }

    #[test]
    fn dedups_and_sorts() {
        let text = "works/2222\nworks/1111\nagain works/2222\n";
        let ids = resolve_lines(text);
        assert_eq!(ids, vec![WorkId::new("1111"), WorkId::new("2222")]);
    }

    #[test]
    fn skips_lines_without_a_work_url() {
        let text = "no url here\n\nhttps://example.com/other/9999\nworks/4242\n";
        let ids = resolve_lines(text);
        assert_eq!(ids, vec![WorkId::new("4242")]);
    }

    #[test]
    fn matches_ids_inside_longer_urls() {
        let ids = resolve_lines("https://archiveofourown.org/works/123456/chapters/789\n");
        assert_eq!(ids, vec![WorkId::new("123456")]);
    }
}
