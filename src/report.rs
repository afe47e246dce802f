use std::fmt;

use crate::error::Result;
use crate::merge::{format_mmss, EvidenceClip};
use chrono::{DateTime, Utc};
use serde_derive::{Deserialize, Serialize};
use tracing::info;

pub const NOT_SPECIFIED: &str = "Not specified";
pub const NO_EVIDENCE: &str = "No evidence clips were included in this report.";
pub const NO_TIME_RANGE: &str = "N/A";
const GENERIC_ACTION: &str = "Review footage and assess situation";
const KEY_OBSERVATION_CLIPS: usize = 3;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub enum IncidentType {
    UnauthorizedAccess,
    Tailgating,
    Loitering,
    SuspiciousObject,
    FightAssault,
    AfterHours,
    Shoplifting,
    Custom,
    /// Category outside the built-in table, carries its display name.
    Other(String),
}

impl IncidentType {
    pub const BUILTIN: [IncidentType; 8] = [
        IncidentType::UnauthorizedAccess,
        IncidentType::Tailgating,
        IncidentType::Loitering,
        IncidentType::SuspiciousObject,
        IncidentType::FightAssault,
        IncidentType::AfterHours,
        IncidentType::Shoplifting,
        IncidentType::Custom,
    ];

    pub fn name(&self) -> &str {
        match self {
            IncidentType::UnauthorizedAccess => "Unauthorized Access",
            IncidentType::Tailgating => "Tailgating",
            IncidentType::Loitering => "Loitering",
            IncidentType::SuspiciousObject => "Suspicious Object Left Behind",
            IncidentType::FightAssault => "Fight / Assault",
            IncidentType::AfterHours => "After-Hours Presence",
            IncidentType::Shoplifting => "Shoplifting / Concealment",
            IncidentType::Custom => "Custom Query",
            IncidentType::Other(name) => name.as_str(),
        }
    }

    /// Inverse of `name`; unknown names become `Other`.
    pub fn from_name(name: &str) -> Self {
        Self::BUILTIN
            .iter()
            .find(|t| t.name() == name)
            .cloned()
            .unwrap_or_else(|| IncidentType::Other(name.to_string()))
    }

    pub fn recommended_actions(&self) -> &'static [&'static str] {
        match self {
            IncidentType::UnauthorizedAccess => &[
                "Review access control logs",
                "Verify identity of individual",
                "Consider security system upgrade",
            ],
            IncidentType::Tailgating => &[
                "Reinforce tailgating policy with employees",
                "Consider adding mantrap or turnstile",
                "Review badge access procedures",
            ],
            IncidentType::Loitering => &[
                "Dispatch security for welfare check",
                "Review historical footage for pattern",
                "Consider additional lighting or signage",
            ],
            IncidentType::SuspiciousObject => &[
                "Do NOT approach the object",
                "Evacuate area if necessary",
                "Contact local authorities immediately",
            ],
            IncidentType::FightAssault => &[
                "Contact emergency services immediately",
                "Preserve video evidence",
                "File incident report with HR/management",
            ],
            IncidentType::AfterHours => &[
                "Verify if authorized personnel",
                "Check building access logs",
                "Confirm with facility management",
            ],
            IncidentType::Shoplifting => &[
                "Do not confront directly",
                "Gather evidence from video",
                "Contact loss prevention / authorities",
            ],
            IncidentType::Custom => &[
                "Review findings based on custom query",
                "Verify if alert matches security policy",
                "Log incident if verified",
            ],
            IncidentType::Other(_) => &[GENERIC_ACTION],
        }
    }
}

impl fmt::Display for IncidentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    pub time: String,
    pub event: String,
    pub notes: String,
}

/// Field names are consumed as-is by the JSON/PDF exporters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IncidentReport {
    pub incident_type: String,
    pub location: String,
    pub camera_id: String,
    pub time_range: String,
    pub created_at: String,
    pub executive_summary: Vec<String>,
    pub timeline: Vec<TimelineEntry>,
    pub evidence: Vec<EvidenceClip>,
    pub recommended_actions: Vec<String>,
}

impl IncidentReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

fn or_not_specified(s: &str) -> String {
    if s.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        s.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportSynthesizer;

impl ReportSynthesizer {
    pub fn generate(
        &self,
        category: &IncidentType,
        clips: &[EvidenceClip],
        location: &str,
        camera_id: &str,
        analysis: Option<&str>,
    ) -> IncidentReport {
        self.generate_at(category, clips, location, camera_id, analysis, Utc::now())
    }

    pub fn generate_at(
        &self,
        category: &IncidentType,
        clips: &[EvidenceClip],
        location: &str,
        camera_id: &str,
        analysis: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> IncidentReport {
        let included: Vec<EvidenceClip> = clips.iter().filter(|c| c.included).cloned().collect();

        let mut report = IncidentReport {
            incident_type: category.name().to_string(),
            location: or_not_specified(location),
            camera_id: or_not_specified(camera_id),
            time_range: NO_TIME_RANGE.to_string(),
            created_at: created_at.to_rfc3339(),
            executive_summary: vec![NO_EVIDENCE.to_string()],
            timeline: Vec::new(),
            evidence: Vec::new(),
            recommended_actions: Vec::new(),
        };

        if included.is_empty() {
            info!(incident = %category, "report generated without evidence");
            return report;
        }

        let min_start = included
            .iter()
            .map(|c| c.start_time)
            .fold(f64::INFINITY, f64::min);
        let max_end = included
            .iter()
            .map(|c| c.end_time)
            .fold(f64::NEG_INFINITY, f64::max);

        let mut ordered: Vec<&EvidenceClip> = included.iter().collect();
        ordered.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

        report.time_range = format!("{} - {}", format_mmss(min_start), format_mmss(max_end));
        report.executive_summary = summarize(category, &included, analysis);
        report.timeline = ordered
            .into_iter()
            .map(|c| TimelineEntry {
                time: format!("{} - {}", c.start_formatted(), c.end_formatted()),
                event: c.label.clone(),
                notes: c.notes.clone(),
            })
            .collect();
        report.recommended_actions = category
            .recommended_actions()
            .iter()
            .map(|a| a.to_string())
            .collect();

        info!(
            incident = %category,
            clips = included.len(),
            time_range = %report.time_range,
            "report generated"
        );

        report.evidence = included;
        report
    }
}

fn summarize(category: &IncidentType, clips: &[EvidenceClip], analysis: Option<&str>) -> Vec<String> {
    let count = clips.len();
    let total: f64 = clips.iter().map(EvidenceClip::duration).sum();
    let mean = clips.iter().map(|c| c.confidence).sum::<f64>() / count as f64;

    let mut summary = vec![
        format!(
            "Detected {} potential {} incident(s)",
            count,
            category.name().to_lowercase()
        ),
        format!("Total evidence duration: {:.1} seconds", total),
        format!("Average confidence score: {:.0}%", mean * 100.0),
    ];

    let mut labels: Vec<&str> = Vec::new();
    for clip in clips.iter().take(KEY_OBSERVATION_CLIPS) {
        if !labels.contains(&clip.label.as_str()) {
            labels.push(&clip.label);
        }
    }
    if !labels.is_empty() {
        summary.push(format!("Key observations: {}", labels.join(", ")));
    }

    if let Some(first) = analysis.and_then(|a| a.split('.').next()) {
        let first = first.trim();
        if !first.is_empty() {
            summary.push(format!("AI Analysis: {}", first));
        }
    }

    summary
}
