use super::*;

#[test]
fn band_boundaries_are_closed_on_the_lower_end() {
    assert_eq!(RiskLabel::from_score(0.39), RiskLabel::Low);
    assert_eq!(RiskLabel::from_score(0.40), RiskLabel::Medium);
    assert_eq!(RiskLabel::from_score(0.6999), RiskLabel::Medium);
    assert_eq!(RiskLabel::from_score(0.70), RiskLabel::High);
}

#[test]
fn extremes() {
    assert_eq!(RiskLabel::from_score(0.0), RiskLabel::Low);
    assert_eq!(RiskLabel::from_score(1.0), RiskLabel::High);
}

#[test]
fn display_matches_wire_labels() {
    assert_eq!(RiskLabel::Low.to_string(), "low");
    assert_eq!(RiskLabel::Medium.to_string(), "medium");
    assert_eq!(RiskLabel::High.to_string(), "high");
}

#[test]
fn serializes_lowercase() {
    let json = serde_json::to_string(&RiskLabel::High).expect("serialize should succeed");
    assert_eq!(json, "\"high\"");
}
