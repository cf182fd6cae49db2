use rknn_bytetrack::tracker::track_color;
use rknn_bytetrack::{BYTETracker, Detection, Rect, TrackState, TrackerConfig};

fn det(x: f32, y: f32, w: f32, h: f32, score: f32) -> Detection {
    Detection::from_rect(Rect::new(x, y, w, h), score)
}

#[test]
fn test_basic_tracking() {
    let mut tracker = BYTETracker::new(TrackerConfig::default()).unwrap();

    // Frame 1: tracks born on the first frame are reported immediately
    let tracks1 = tracker.update(vec![Detection::new(100.0, 100.0, 200.0, 200.0, 0.9)]);
    assert_eq!(tracks1.len(), 1);
    let id1 = tracks1[0].track_id;

    // Frame 2: Same object moved slightly
    let tracks2 = tracker.update(vec![Detection::new(105.0, 105.0, 205.0, 205.0, 0.9)]);
    assert_eq!(tracks2.len(), 1);
    assert_eq!(tracks2[0].track_id, id1);

    // Frame 3: confidence dip, kept alive by the low-score pass
    let tracks3 = tracker.update(vec![Detection::new(110.0, 110.0, 210.0, 210.0, 0.2)]);
    assert_eq!(tracks3.len(), 1);
    assert_eq!(tracks3[0].track_id, id1);
    assert_eq!(tracks3[0].score, 0.2);

    // Frame 4: Object disappears
    assert!(tracker.update(vec![]).is_empty());
    assert_eq!(tracker.lost_tracks().count(), 1);

    // Frame 5: Object reappears within the buffer and is re-acquired
    let tracks5 = tracker.update(vec![Detection::new(115.0, 115.0, 215.0, 215.0, 0.9)]);
    assert_eq!(tracks5.len(), 1);
    assert_eq!(tracks5[0].track_id, id1);
    assert_eq!(tracks5[0].state, TrackState::Tracked);
}

#[test]
fn test_single_object_lifecycle() {
    let mut tracker = BYTETracker::with_frame_rate(30, 30).unwrap();
    let max_time_lost = tracker.max_time_lost();

    let tracks = tracker.update_at(vec![det(10.0, 10.0, 50.0, 50.0, 0.9).with_label(0)], 1);
    assert_eq!(tracks.len(), 1);
    let id0 = tracks[0].track_id;
    let r = tracks[0].rect;
    assert!((r.x - 10.0).abs() < 1e-3 && (r.y - 10.0).abs() < 1e-3);
    assert!((r.width - 50.0).abs() < 1e-3 && (r.height - 50.0).abs() < 1e-3);

    let tracks = tracker.update_at(vec![det(12.0, 11.0, 50.0, 50.0, 0.85).with_label(0)], 2);
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].track_id, id0);
    assert!(tracks[0].rect.x > 10.0 && tracks[0].rect.x <= 12.0);
    assert!(tracks[0].rect.y > 10.0 && tracks[0].rect.y <= 11.0);
    assert_eq!(tracks[0].score, 0.85);

    let last = 3 + max_time_lost;
    for frame in 3..=last {
        let tracks = tracker.update_at(vec![], frame);
        assert!(tracks.iter().all(|t| t.track_id != id0));
        if frame < last {
            assert_eq!(tracker.lost_tracks().count(), 1, "frame {frame}");
        }
    }
    assert_eq!(tracker.lost_tracks().count(), 0);
    assert_eq!(tracker.removed_track_ids(), &[id0]);

    // Identities are never reused.
    let tracks = tracker.update(vec![det(10.0, 10.0, 50.0, 50.0, 0.9)]);
    assert!(tracks.is_empty(), "new tracks after the first frame start unconfirmed");
    let tracks = tracker.update(vec![det(10.0, 10.0, 50.0, 50.0, 0.9)]);
    assert_eq!(tracks.len(), 1);
    assert!(tracks[0].track_id > id0);
}

#[test]
fn test_disjoint_detections_get_distinct_ids() {
    let mut tracker = BYTETracker::default();
    let tracks = tracker.update(vec![
        det(0.0, 0.0, 40.0, 80.0, 0.9),
        det(200.0, 0.0, 40.0, 80.0, 0.9),
    ]);
    assert_eq!(tracks.len(), 2);
    assert_ne!(tracks[0].track_id, tracks[1].track_id);
}

#[test]
fn test_identity_stable_while_moving() {
    let mut tracker = BYTETracker::default();
    let mut ids = Vec::new();
    for frame in 0..60 {
        let a = det(20.0 + 3.0 * frame as f32, 50.0, 40.0, 80.0, 0.9);
        let b = det(500.0 - 2.0 * frame as f32, 300.0, 60.0, 120.0, 0.8);
        let mut tracks = tracker.update(vec![a, b]);
        assert_eq!(tracks.len(), 2, "frame {frame}");
        tracks.sort_by(|x, y| x.rect.y.total_cmp(&y.rect.y));
        ids.push((tracks[0].track_id, tracks[1].track_id));
    }
    assert!(ids.iter().all(|pair| *pair == ids[0]));
}

#[test]
fn test_low_score_detection_cannot_resurrect_lost_track() {
    let mut tracker = BYTETracker::default();
    let id = tracker.update(vec![det(0.0, 0.0, 40.0, 80.0, 0.9)])[0].track_id;
    tracker.update(vec![det(0.0, 0.0, 40.0, 80.0, 0.9)]);
    assert!(tracker.update(vec![]).is_empty());

    assert!(tracker.update(vec![det(0.0, 0.0, 40.0, 80.0, 0.3)]).is_empty());
    assert_eq!(tracker.lost_tracks().count(), 1);
    assert_eq!(tracker.tracked_tracks().count(), 0);

    let tracks = tracker.update(vec![det(0.0, 0.0, 40.0, 80.0, 0.9)]);
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].track_id, id);
}

#[test]
fn test_duplicate_suppression_keeps_longer_tracklet() {
    let mut tracker = BYTETracker::default();
    let a = |score| det(100.0, 100.0, 50.0, 100.0, score);
    let b = |score| det(102.0, 100.0, 50.0, 100.0, score);

    let id_a = tracker.update(vec![a(0.9)])[0].track_id;
    tracker.update(vec![a(0.9)]);

    // A second, heavily overlapping object appears and gets confirmed.
    tracker.update(vec![a(0.9), b(0.9)]);
    let mut id_b = None;
    for _ in 0..4 {
        let tracks = tracker.update(vec![a(0.9), b(0.9)]);
        assert_eq!(tracks.len(), 2);
        let other = tracks.iter().find(|t| t.track_id != id_a).map(|t| t.track_id);
        assert!(id_b.is_none() || id_b == other);
        id_b = other;
    }
    let id_b = id_b.unwrap();

    // The two boxes merge into one detection: only the older track survives.
    let tracks = tracker.update(vec![a(0.9)]);
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].track_id, id_a);
    assert!(tracker.removed_track_ids().contains(&id_b));
    assert!(tracker.lost_tracks().all(|t| t.track_id != id_b));

    for _ in 0..3 {
        let tracks = tracker.update(vec![a(0.9), b(0.4)]);
        assert!(tracks.iter().all(|t| t.track_id != id_b));
    }
}

#[test]
fn test_trackers_are_independent() {
    let mut first = BYTETracker::default();
    let mut second = BYTETracker::default();

    let a = first.update(vec![det(0.0, 0.0, 10.0, 20.0, 0.9)]);
    let b = second.update(vec![det(0.0, 0.0, 10.0, 20.0, 0.9)]);
    assert_eq!(a[0].track_id, b[0].track_id);

    first.update(vec![det(0.0, 0.0, 10.0, 20.0, 0.9), det(100.0, 0.0, 10.0, 20.0, 0.9)]);
    assert_eq!(first.tracked_tracks().count(), 2);
    assert_eq!(second.tracked_tracks().count(), 1);
}

#[test]
fn test_labels_follow_detections() {
    let mut tracker = BYTETracker::default();
    let tracks = tracker.update(vec![det(0.0, 0.0, 40.0, 80.0, 0.9).with_label(2).with_name("car")]);
    assert_eq!(tracks[0].label, 2);
    assert_eq!(tracks[0].name.as_deref(), Some("car"));

    let tracks = tracker.update(vec![det(1.0, 0.0, 40.0, 80.0, 0.9).with_label(7)]);
    assert_eq!(tracks[0].label, 7);
    assert_eq!(tracks[0].name.as_deref(), Some("car"));
    assert_eq!(track_color(tracks[0].track_id), track_color(tracks[0].track_id));
}

#[test]
fn test_config_from_json() {
    let config: TrackerConfig =
        serde_json::from_str(r#"{ "high_thresh": 0.6, "weights": { "speed": 0.3 } }"#).unwrap();
    assert_eq!(config.high_thresh, 0.6);
    assert_eq!(config.track_thresh, TrackerConfig::default().track_thresh);
    assert_eq!(config.weights.speed, 0.3);
    assert_eq!(config.weights.posture, 0.0);
    assert!(BYTETracker::new(config.clone()).is_ok());

    let json = serde_json::to_string(&config).unwrap();
    let back: TrackerConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn test_weighted_association_still_tracks() {
    let config = TrackerConfig {
        weights: rknn_bytetrack::AssociationWeights::proportional(),
        fuse_score: true,
        ..Default::default()
    };
    let mut tracker = BYTETracker::new(config).unwrap();
    let id = tracker.update(vec![det(0.0, 0.0, 40.0, 80.0, 0.9)])[0].track_id;
    for frame in 1..20 {
        let tracks = tracker.update(vec![det(2.0 * frame as f32, 0.0, 40.0, 80.0, 0.9)]);
        assert_eq!(tracks.len(), 1, "frame {frame}");
        assert_eq!(tracks[0].track_id, id);
    }
}
