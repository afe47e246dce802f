use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use vigil::merge::label_from_query;
use vigil::{MergeConfig, Moment, MomentMerger};

fn merger() -> MomentMerger {
    MomentMerger::new(MergeConfig::default()).unwrap()
}

#[test]
fn test_close_moments_merge_into_padded_clip() {
    let clips = merger().merge(
        &[
            Moment::new(1.0, 3.0, 0.6, "person near door"),
            Moment::new(3.5, 5.0, 0.8, "person near door"),
        ],
        100.0,
    );

    assert_eq!(clips.len(), 1);
    assert_abs_diff_eq!(clips[0].start_time, 0.0);
    assert_abs_diff_eq!(clips[0].end_time, 6.0);
    assert_abs_diff_eq!(clips[0].confidence, 0.8);
    assert_eq!(clips[0].query_matched, "person near door");
}

#[test]
fn test_empty_input() {
    assert!(merger().merge(&[], 100.0).is_empty());
    assert!(merger().merge(&[], f64::INFINITY).is_empty());
}

#[test]
fn test_equal_starts_keep_input_order() {
    let clips = merger().merge(
        &[
            Moment::new(10.0, 11.0, 0.5, "first").with_label("First"),
            Moment::new(10.0, 12.0, 0.5, "second").with_label("Second"),
        ],
        100.0,
    );
    assert_eq!(clips.len(), 1);
    assert_eq!(clips[0].label, "First");
    assert_eq!(clips[0].query_matched, "first; second");
}

#[test]
fn test_gap_boundary_is_inclusive() {
    // Padded: [9, 12] then [14, 16]; 14 <= 12 + 2 merges.
    let clips = merger().merge(
        &[Moment::new(10.0, 11.0, 0.5, "a"), Moment::new(15.0, 15.0, 0.5, "b")],
        100.0,
    );
    assert_eq!(clips.len(), 1);

    let clips = merger().merge(
        &[Moment::new(10.0, 11.0, 0.5, "a"), Moment::new(15.5, 16.0, 0.5, "b")],
        100.0,
    );
    assert_eq!(clips.len(), 2);
}

#[test]
fn test_substring_queries_are_not_repeated() {
    let clips = merger().merge(
        &[
            Moment::new(1.0, 2.0, 0.5, "person leaves a bag near exit"),
            Moment::new(1.5, 2.5, 0.5, "a bag"),
            Moment::new(2.0, 3.0, 0.5, ""),
        ],
        100.0,
    );
    assert_eq!(clips[0].query_matched, "person leaves a bag near exit");
    assert_eq!(clips[0].label, label_from_query("person leaves a bag near exit"));
}

#[test]
fn test_custom_config() {
    let merger = MomentMerger::new(MergeConfig {
        padding: 0.0,
        merge_gap: 0.0,
        max_clip_length: 5.0,
    })
    .unwrap();

    let clips = merger.merge(
        &[Moment::new(0.0, 2.0, 0.5, "a"), Moment::new(2.5, 20.0, 0.5, "b")],
        100.0,
    );
    assert_eq!(clips.len(), 2);
    assert_abs_diff_eq!(clips[1].end_time, 7.5);
}

proptest! {
    #[test]
    fn prop_clips_sorted_disjoint_and_bounded(
        raw in prop::collection::vec((0.0f64..300.0, 0.0f64..20.0, 0.0f64..1.0), 0..40),
        duration in 50.0f64..400.0,
    ) {
        let moments: Vec<Moment> = raw
            .iter()
            .map(|&(start, len, conf)| Moment::new(start, start + len, conf, "q"))
            .collect();

        let config = MergeConfig::default();
        let clips = merger().merge(&moments, duration);

        prop_assert!(clips.len() <= moments.len());
        for clip in &clips {
            prop_assert!(clip.end_time >= clip.start_time);
            prop_assert!(clip.duration() <= config.max_clip_length + 1e-9);
            prop_assert!(clip.start_time >= 0.0);
        }
        for pair in clips.windows(2) {
            prop_assert!(pair[0].start_time < pair[1].start_time);
            prop_assert!(pair[0].end_time < pair[1].start_time);
        }
    }
}
