use crate::config::Config;
use crate::error::{ensure_non_negative, ensure_positive, Result};
use crate::geometry::Interval;
use serde_derive::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_LABEL: &str = "Suspicious activity detected";
const LABEL_WORDS: usize = 6;
const QUERY_SEPARATOR: &str = "; ";

/// Raw time-stamped hit from any analysis source.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Moment {
    pub start: f64,
    pub end: f64,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
}

impl Moment {
    pub fn new(start: f64, end: f64, confidence: f64, query: impl Into<String>) -> Self {
        Self {
            start,
            end,
            confidence,
            label: None,
            query: query.into(),
            video_id: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_video_id(mut self, video_id: impl Into<String>) -> Self {
        self.video_id = Some(video_id.into());
        self
    }
}

/// Consolidated, report-worthy segment.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EvidenceClip {
    pub start_time: f64,
    pub end_time: f64,
    pub confidence: f64,
    pub label: String,
    pub query_matched: String,
    pub included: bool,
    pub notes: String,
    pub video_id: String,
}

impl EvidenceClip {
    #[inline]
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    #[inline]
    pub fn start_formatted(&self) -> String {
        format_mmss(self.start_time)
    }

    #[inline]
    pub fn end_formatted(&self) -> String {
        format_mmss(self.end_time)
    }
}

/// `mm:ss`, both parts truncated.
pub fn format_mmss(seconds: f64) -> String {
    let mins = (seconds / 60.0).floor() as i64;
    let secs = seconds.rem_euclid(60.0).floor() as i64;

    format!("{:02}:{:02}", mins, secs)
}

/// First six words of the query, "..." when there were more, first
/// character upper-cased.
pub fn label_from_query(query: &str) -> String {
    let words: Vec<&str> = query.split_whitespace().collect();
    if words.is_empty() {
        return DEFAULT_LABEL.to_string();
    }

    let mut label = words[..words.len().min(LABEL_WORDS)].join(" ");
    if words.len() > LABEL_WORDS {
        label.push_str("...");
    }

    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => label,
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct MergeConfig {
    /// Seconds added on both sides of every moment.
    pub padding: f64,
    /// Max gap in seconds between a clip end and the next padded start.
    pub merge_gap: f64,
    pub max_clip_length: f64,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            padding: 1.0,
            merge_gap: 2.0,
            max_clip_length: 15.0,
        }
    }
}

impl MergeConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("padding", self.padding)?;
        ensure_non_negative("merge_gap", self.merge_gap)?;
        ensure_positive("max_clip_length", self.max_clip_length)?;

        Ok(())
    }
}

struct Accumulator {
    span: Interval,
    confidence: f64,
    label: String,
    query: String,
    video_id: String,
}

impl Accumulator {
    fn new(span: Interval, m: &Moment) -> Self {
        let label = match &m.label {
            Some(label) if !label.trim().is_empty() => label.clone(),
            _ => label_from_query(&m.query),
        };

        Self {
            span,
            confidence: m.confidence,
            label,
            query: m.query.clone(),
            video_id: m.video_id.clone().unwrap_or_default(),
        }
    }

    fn absorb(&mut self, span: Interval, m: &Moment) {
        self.span.end = self.span.end.max(span.end);
        self.confidence = self.confidence.max(m.confidence);

        if m.query.is_empty() || self.query.contains(m.query.as_str()) {
            return;
        }

        if !self.query.is_empty() {
            self.query.push_str(QUERY_SEPARATOR);
        }
        self.query.push_str(&m.query);
    }

    fn finalize(self, max_len: f64) -> EvidenceClip {
        let mut span = self.span;
        if span.duration() > max_len {
            debug!(
                start = span.start,
                end = span.end,
                "clip truncated to {}s",
                max_len
            );
            span.end = span.start + max_len;
        }

        EvidenceClip {
            start_time: span.start,
            end_time: span.end,
            confidence: self.confidence,
            label: self.label,
            query_matched: self.query,
            included: true,
            notes: String::new(),
            video_id: self.video_id,
        }
    }
}

/// Sweeps padded moments in start order into bounded, non-overlapping clips.
#[derive(Debug, Clone, Default)]
pub struct MomentMerger {
    config: MergeConfig,
}

impl MomentMerger {
    pub fn new(config: MergeConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self { config })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.merge)
    }

    #[inline]
    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// `video_duration` caps padded ends, `f64::INFINITY` when unknown.
    pub fn merge(&self, moments: &[Moment], video_duration: f64) -> Vec<EvidenceClip> {
        let mut sorted: Vec<&Moment> = moments.iter().collect();
        sorted.sort_by(|a, b| a.start.total_cmp(&b.start));

        let mut clips = Vec::new();
        let mut current: Option<Accumulator> = None;

        for m in sorted {
            let span = Interval::new(m.start, m.end).padded(self.config.padding, video_duration);

            current = Some(match current.take() {
                Some(mut acc) if acc.span.extended(self.config.merge_gap).overlaps(&span) => {
                    acc.absorb(span, m);
                    acc
                }
                Some(acc) => {
                    clips.push(acc.finalize(self.config.max_clip_length));
                    Accumulator::new(span, m)
                }
                None => Accumulator::new(span, m),
            });
        }

        if let Some(acc) = current {
            clips.push(acc.finalize(self.config.max_clip_length));
        }

        debug!(moments = moments.len(), clips = clips.len(), "moments merged");

        clips
    }
}
