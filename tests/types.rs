use chart_playlist::{
    ChartKind, Rank, RawTrackRecord, ScrapeOutcome, TrackCandidate,
};

#[test]
fn test_display_implementations() {
    let ranked = RawTrackRecord::ranked(Rank::Position(7), "Levitating", "Dua Lipa");
    assert_eq!(format!("{ranked}"), "#7: Levitating - Dua Lipa");

    let no_rank = RawTrackRecord::ranked(Rank::NotAvailable, "Levitating", "Dua Lipa");
    assert_eq!(format!("{no_rank}"), "#N/A: Levitating - Dua Lipa");

    let unranked = RawTrackRecord::new("Casey Screams", "Megatronic");
    assert_eq!(format!("{unranked}"), "Casey Screams - Megatronic");

    let candidate = TrackCandidate {
        id: "1".to_string(),
        name: "Hypnotized".to_string(),
        primary_artist_name: "John Summit".to_string(),
    };
    assert_eq!(format!("{candidate}"), "Hypnotized - John Summit");

    let outcome = ScrapeOutcome::extracted(2, "Extracted 2 songs");
    assert_eq!(format!("{outcome}"), "ok (2 records): Extracted 2 songs");

    assert_eq!(
        format!("{}", ChartKind::TraxsourceDeepHouse),
        "Traxsource Top Deep House"
    );
}

#[test]
fn test_record_serialization() {
    let record = RawTrackRecord::ranked(Rank::Position(1), "Mood", "24kGoldn");
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"rank": {"Position": 1}, "title": "Mood", "artist": "24kGoldn"})
    );

    let unranked = serde_json::to_value(RawTrackRecord::new("Song", "")).unwrap();
    assert_eq!(unranked["rank"], serde_json::Value::Null);
}

#[test]
fn test_chart_kind_slugs_round_trip_through_from_str() {
    for kind in ChartKind::ALL {
        assert_eq!(kind.slug().parse::<ChartKind>(), Ok(kind));
    }
}
