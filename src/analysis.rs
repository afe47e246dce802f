use crate::merge::Moment;
use crate::query::Sensitivity;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static MMSS_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+:\d{2})\s*[-–]\s*(\d+:\d{2})\s*:\s*([^(]+)\s*\((\w+)\)").unwrap()
});

static SECONDS_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*[-–]\s*(\d+(?:\.\d+)?)\s*:\s*([^(]+)\s*\((\w+)\)").unwrap()
});

static TIME_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+:\d{2}|\d+(?:\.\d+)?").unwrap());

const MIN_FREEFORM_LEN: usize = 20;
const FREEFORM_CONFIDENCE: f64 = 0.5;
const FALLBACK_SPAN: (f64, f64) = (0.0, 10.0);

/// Confidence word from the backend answer mapped to a score.
pub fn confidence_score(word: &str) -> f64 {
    match word.to_lowercase().as_str() {
        "high" => 0.9,
        "medium" => 0.7,
        "low" => 0.5,
        _ => 0.6,
    }
}

/// Seconds from `ss`, `mm:ss` or `h:mm:ss`.
pub fn parse_timestamp(s: &str) -> Option<f64> {
    let parts: Vec<&str> = s.trim().split(':').collect();

    match parts.as_slice() {
        [secs] => secs.trim().parse().ok(),
        [mins, secs] => Some(mins.parse::<f64>().ok()? * 60.0 + secs.parse::<f64>().ok()?),
        [hours, mins, secs] => Some(
            hours.parse::<f64>().ok()? * 3600.0
                + mins.parse::<f64>().ok()? * 60.0
                + secs.parse::<f64>().ok()?,
        ),
        _ => None,
    }
}

fn truncated(s: &str, n: usize) -> String {
    s.chars().take(n).collect::<String>().trim().to_string()
}

fn moment(start: f64, end: f64, confidence: f64, label: String, query: &str, video_id: &str) -> Moment {
    let m = Moment::new(start, end, confidence, query).with_label(label);
    if video_id.is_empty() {
        m
    } else {
        m.with_video_id(video_id)
    }
}

/// Extracts moments from a free-text analysis answer.
///
/// Expected lines look like `15-22: Person near door (high)` or
/// `1:05-1:12: Person near door (medium)`. Longer answers without that shape
/// still yield a single low-confidence moment so the query is not lost.
pub fn parse_analysis_moments(text: &str, query: &str, video_id: &str) -> Vec<Moment> {
    if text.trim().is_empty() || text.to_uppercase().contains("NONE") {
        return Vec::new();
    }

    let structured = if MMSS_LINE.is_match(text) {
        &*MMSS_LINE
    } else {
        &*SECONDS_LINE
    };

    let mut moments: Vec<Moment> = structured
        .captures_iter(text)
        .filter_map(|cap| {
            let start = parse_timestamp(&cap[1])?;
            let end = parse_timestamp(&cap[2])?;

            Some(moment(
                start,
                end,
                confidence_score(&cap[4]),
                cap[3].trim().to_string(),
                query,
                video_id,
            ))
        })
        .collect();

    if !moments.is_empty() || text.chars().count() <= MIN_FREEFORM_LEN {
        return moments;
    }

    let times: Vec<f64> = TIME_TOKEN
        .find_iter(text)
        .filter_map(|m| parse_timestamp(m.as_str()))
        .take(2)
        .collect();

    if let [start, end] = times.as_slice() {
        moments.push(moment(
            *start,
            *end,
            FREEFORM_CONFIDENCE,
            truncated(text, 80),
            query,
            video_id,
        ));
    } else {
        debug!(query, "no time ranges in analysis text, using fallback span");
        moments.push(moment(
            FALLBACK_SPAN.0,
            FALLBACK_SPAN.1,
            FREEFORM_CONFIDENCE,
            truncated(text, 50),
            query,
            video_id,
        ));
    }

    moments
}

/// Parses one answer per query, keeps the first `top_k` moments of each and
/// concatenates them in query order, ready for merging.
pub fn collect_moments<Q, A>(
    answers: &[(Q, A)],
    video_id: &str,
    sensitivity: Sensitivity,
) -> Vec<Moment>
where
    Q: AsRef<str>,
    A: AsRef<str>,
{
    let top_k = sensitivity.top_k();

    answers
        .iter()
        .flat_map(|(query, text)| {
            let mut moments = parse_analysis_moments(text.as_ref(), query.as_ref(), video_id);
            if moments.len() > top_k {
                debug!(query = query.as_ref(), found = moments.len(), top_k, "moments capped");
                moments.truncate(top_k);
            }
            moments
        })
        .collect()
}
