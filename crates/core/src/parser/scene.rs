//! Regex-based parser for scene-style release names.

use std::sync::LazyLock;

use regex_lite::Regex;

use super::{ParsedName, ReleaseNameParser};

static RE_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.([A-Za-z0-9]{2,4})$").expect("valid regex"));
static RE_LEADING_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\]]+)\]\s*").expect("valid regex"));
static RE_SEASON_EPISODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bS(\d{1,2}) ?((?:[ -]?E\d{1,3})+)\b").expect("valid regex")
});
static RE_CROSS_EPISODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,2})x(\d{2,3})\b").expect("valid regex"));
static RE_SEASON_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:S|Season )(\d{1,2})\b").expect("valid regex"));
static RE_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(19\d{2}|20\d{2})\b").expect("valid regex"));
static RE_RESOLUTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{3,4}p|4k)\b").expect("valid regex"));
static RE_QUALITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(blu-?ray|bdrip|brrip|web-?dl|webrip|hdtv|dvdrip|hdrip|remux|x264|x265|h264|h265|hevc|xvid|aac|ac3|dts|proper|repack|10bit|hdr)\b",
    )
    .expect("valid regex")
});
static RE_TRAILING_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-([A-Za-z0-9]+)$").expect("valid regex"));
static RE_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Parser for names like `Show.Name.S01E02.720p.HDTV.x264-GROUP.mkv` or
/// `Movie Title (2010) [1080p].mp4`.
///
/// The title is everything before the first recognised marker (year,
/// season/episode, resolution or quality tag).
#[derive(Debug, Default, Clone)]
pub struct SceneNameParser;

impl SceneNameParser {
    pub fn new() -> Self {
        Self
    }
}

impl ReleaseNameParser for SceneNameParser {
    fn parse(&self, file_name: &str) -> ParsedName {
        let mut parsed = ParsedName::default();

        let stem = strip_extension(file_name);
        let mut name = stem.replace(['.', '_'], " ");

        if let Some(caps) = RE_LEADING_GROUP.captures(&name) {
            parsed.extras.push(caps[1].trim().to_string());
            let end = caps.get(0).map_or(0, |m| m.end());
            name = name[end..].to_string();
        }

        // Start offsets of everything that ends the title.
        let mut markers: Vec<usize> = Vec::new();

        if let Some(caps) = RE_SEASON_EPISODE.captures(&name) {
            parsed.season = caps[1].parse().ok();
            parsed.episodes = RE_DIGITS
                .find_iter(&caps[2])
                .filter_map(|m| m.as_str().parse().ok())
                .collect();
            markers.extend(caps.get(0).map(|m| m.start()));
        } else if let Some(caps) = RE_CROSS_EPISODE.captures(&name) {
            parsed.season = caps[1].parse().ok();
            parsed.episodes = caps[2].parse().ok().into_iter().collect();
            markers.extend(caps.get(0).map(|m| m.start()));
        } else if let Some(caps) = RE_SEASON_ONLY.captures(&name) {
            parsed.season = caps[1].parse().ok();
            markers.extend(caps.get(0).map(|m| m.start()));
        }

        // A year at the very start is part of the title ("2012.2009.mkv").
        if let Some(m) = RE_YEAR.find_iter(&name).filter(|m| m.start() > 0).last() {
            parsed.year = m.as_str().parse().ok();
            markers.push(m.start());
        }

        if let Some(m) = RE_RESOLUTION.find(&name) {
            parsed.resolution = Some(m.as_str().to_lowercase());
            markers.push(m.start());
        }

        for m in RE_QUALITY.find_iter(&name) {
            parsed.extras.push(m.as_str().to_string());
            markers.push(m.start());
        }

        let title_end = match markers.iter().min() {
            Some(&start) => {
                if let Some(caps) = RE_TRAILING_GROUP.captures(name.trim_end()) {
                    parsed.extras.push(caps[1].to_string());
                }
                start
            }
            None => name.len(),
        };

        let title = clean_title(&name[..title_end]);
        if !title.is_empty() {
            parsed.title = Some(title);
        }

        parsed
    }
}

/// Drops a trailing `.ext`; all-digit suffixes (`Movie.2010`) are not extensions.
fn strip_extension(file_name: &str) -> &str {
    match RE_EXTENSION.captures(file_name) {
        Some(caps) if !caps[1].chars().all(|c| c.is_ascii_digit()) => {
            let start = caps.get(0).map_or(file_name.len(), |m| m.start());
            &file_name[..start]
        }
        _ => file_name,
    }
}

fn clean_title(raw: &str) -> String {
    let trimmed = raw.trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '(' | '[' | ')' | ']'));
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}
