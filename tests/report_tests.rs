use vigil::report::{NO_EVIDENCE, NO_TIME_RANGE};
use vigil::{IncidentReport, IncidentType, MergeConfig, Moment, MomentMerger, ReportSynthesizer};

fn clips() -> Vec<vigil::EvidenceClip> {
    let merger = MomentMerger::new(MergeConfig::default()).unwrap();
    merger.merge(
        &[
            Moment::new(12.3, 15.0, 0.91, "person loitering near door"),
            Moment::new(64.0, 70.5, 0.55, "suspicious person waiting outside")
                .with_video_id("asset-42"),
            Moment::new(14.0, 18.0, 0.7, "person standing idle near entrance"),
        ],
        600.0,
    )
}

#[test]
fn test_all_excluded_is_terminal_report() {
    let mut clips = clips();
    for c in clips.iter_mut() {
        c.included = false;
    }

    let report = ReportSynthesizer.generate(&IncidentType::Loitering, &clips, "Dock", "cam-2", None);
    assert_eq!(report.time_range, NO_TIME_RANGE);
    assert!(report.timeline.is_empty());
    assert!(report.evidence.is_empty());
    assert!(report.recommended_actions.is_empty());
    assert_eq!(report.executive_summary, vec![NO_EVIDENCE]);
    assert_eq!(report.location, "Dock");
}

#[test]
fn test_report_from_merged_moments() {
    let clips = clips();
    assert_eq!(clips.len(), 2);

    let report = ReportSynthesizer.generate(
        &IncidentType::Loitering,
        &clips,
        "Warehouse east",
        "cam-7",
        Some("A man waits by the door for two minutes. Nobody else appears."),
    );

    assert_eq!(report.incident_type, "Loitering");
    assert_eq!(report.time_range, "00:11 - 01:11");
    assert_eq!(report.timeline.len(), 2);
    assert_eq!(report.timeline[0].time, "00:11 - 00:19");
    assert_eq!(report.timeline[0].event, "Person loitering near door");
    assert_eq!(report.timeline[1].time, "01:03 - 01:11");
    assert_eq!(report.evidence[1].video_id, "asset-42");
    assert_eq!(
        report.executive_summary.last().map(String::as_str),
        Some("AI Analysis: A man waits by the door for two minutes")
    );
    assert_eq!(
        report.recommended_actions[0],
        "Dispatch security for welfare check"
    );
}

#[test]
fn test_json_round_trip() {
    let report = ReportSynthesizer.generate(
        &IncidentType::SuspiciousObject,
        &clips(),
        "",
        "lobby-1",
        None,
    );

    let json = report.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    for key in [
        "incident_type",
        "location",
        "camera_id",
        "time_range",
        "created_at",
        "executive_summary",
        "timeline",
        "evidence",
        "recommended_actions",
    ] {
        assert!(value.get(key).is_some(), "missing {}", key);
    }
    for key in ["time", "event", "notes"] {
        assert!(value["timeline"][0].get(key).is_some());
    }
    for key in [
        "start_time",
        "end_time",
        "confidence",
        "label",
        "query_matched",
        "included",
        "notes",
        "video_id",
    ] {
        assert!(value["evidence"][0].get(key).is_some());
    }

    let back = IncidentReport::from_json(&json).unwrap();
    assert_eq!(back, report);
}
