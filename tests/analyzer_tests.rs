use pairlock::domain::analyzer::MAX_CONFIDENCE;
use pairlock::domain::{AnalyzerConfig, PriceAnalyzer, Side};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn guard_rejects_pair_before_recording() {
    let mut analyzer = PriceAnalyzer::new(AnalyzerConfig::default());
    analyzer.observe(dec!(0.45), dec!(0.50));

    assert!(analyzer.get_opportunity(dec!(0.50), dec!(0.49)).is_none());
    assert!(analyzer.get_opportunity(dec!(0.70), dec!(0.60)).is_none());
    assert_eq!(analyzer.sample_count(), 1);
}

#[test]
fn fallback_rule_applies_below_five_samples() {
    let mut analyzer = PriceAnalyzer::new(AnalyzerConfig::default());
    for _ in 0..4 {
        analyzer.observe(dec!(0.50), dec!(0.48));
    }

    let cheap = analyzer.is_cheap(Side::Yes, dec!(0.44));
    assert!(cheap.is_cheap);
    assert_eq!(cheap.discount, Decimal::ZERO);
    assert!(!analyzer.is_cheap(Side::Yes, dec!(0.45)).is_cheap);
}

#[test]
fn discount_rule_needs_volatility_from_five_samples() {
    let mut analyzer = PriceAnalyzer::new(AnalyzerConfig::default());
    for _ in 0..5 {
        analyzer.observe(dec!(0.50), dec!(0.48));
    }

    // Flat history: a deep discount alone is not enough.
    let flat = analyzer.is_cheap(Side::Yes, dec!(0.30));
    assert!(!flat.is_cheap);
    assert_eq!(flat.discount, dec!(0.4));
}

#[test]
fn volatile_dip_is_reported_with_capped_confidence() {
    let mut analyzer = PriceAnalyzer::new(AnalyzerConfig::default());
    for yes in [dec!(0.40), dec!(0.58), dec!(0.40), dec!(0.58)] {
        analyzer.get_opportunity(yes, dec!(0.40));
    }

    let opportunity = analyzer
        .get_opportunity(dec!(0.20), dec!(0.40))
        .expect("YES dip");
    assert_eq!(opportunity.side, Side::Yes);
    assert_eq!(opportunity.price, dec!(0.20));
    assert_eq!(opportunity.pair_cost, dec!(0.60));
    assert!(opportunity.discount > dec!(0.5));
    assert_eq!(opportunity.confidence, MAX_CONFIDENCE);
    assert_eq!(analyzer.sample_count(), 5);
}

#[test]
fn window_drops_oldest_samples() {
    let mut analyzer = PriceAnalyzer::new(AnalyzerConfig {
        window_size: 3,
        ..AnalyzerConfig::default()
    });
    for yes in [dec!(0.10), dec!(0.40), dec!(0.40), dec!(0.40)] {
        analyzer.observe(yes, dec!(0.50));
    }
    assert_eq!(analyzer.sample_count(), 3);
    assert_eq!(analyzer.average(Side::Yes), dec!(0.40));
}

#[test]
fn reset_clears_history() {
    let mut analyzer = PriceAnalyzer::new(AnalyzerConfig::default());
    analyzer.observe(dec!(0.45), dec!(0.50));
    analyzer.reset();

    assert_eq!(analyzer.sample_count(), 0);
    assert_eq!(analyzer.average(Side::No), dec!(0.5));
    assert_eq!(analyzer.average_pair_cost(), Decimal::ONE);
}
