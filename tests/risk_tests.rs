use pairlock::domain::{RiskCheck, RiskConfig, RiskManager, RiskRejection, StopReason};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn manager(max_loss: Decimal) -> RiskManager {
    let mut risk = RiskManager::new(RiskConfig {
        max_loss_per_window: max_loss,
        max_drawdown_pct: dec!(0.10),
        max_unhedged_exposure: dec!(200),
        initial_capital: None,
    });
    risk.set_initial_capital(dec!(1000));
    risk
}

/// Hold `cost` worth of YES that now bids at zero, so unrealized P&L is `-cost`.
fn mark_loss(risk: &mut RiskManager, cost: Decimal) {
    risk.update_exposure(dec!(100), cost, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, dec!(0.5));
}

#[test]
fn drawdown_trips_only_past_the_fraction() {
    let mut risk = manager(dec!(10000));

    mark_loss(&mut risk, dec!(95));
    assert_eq!(risk.state().unrealized_pnl, dec!(-95));
    assert!(risk.should_stop_trading().is_none());

    mark_loss(&mut risk, dec!(105));
    match risk.should_stop_trading() {
        Some(StopReason::MaxDrawdown { drawdown, limit }) => {
            assert_eq!(drawdown, dec!(0.105));
            assert_eq!(limit, dec!(0.10));
        }
        other => panic!("expected drawdown stop, got {other:?}"),
    }
}

#[test]
fn max_loss_boundary_is_strict() {
    let mut risk = manager(dec!(50));

    mark_loss(&mut risk, dec!(50));
    assert!(risk.should_stop_trading().is_none());

    mark_loss(&mut risk, dec!(50.01));
    assert!(matches!(
        risk.should_stop_trading(),
        Some(StopReason::MaxLoss { .. })
    ));
}

#[test]
fn max_loss_is_checked_before_drawdown() {
    let mut risk = manager(dec!(50));
    mark_loss(&mut risk, dec!(500));
    assert!(matches!(
        risk.should_stop_trading(),
        Some(StopReason::MaxLoss { .. })
    ));
}

#[test]
fn gains_never_stop_trading() {
    let mut risk = manager(dec!(50));
    risk.update_exposure(dec!(100), dec!(40), dec!(100), dec!(50), dec!(0.6), dec!(0.5));
    assert_eq!(risk.state().unrealized_pnl, dec!(20));
    assert_eq!(risk.state().current_exposure, dec!(90));
    assert!(risk.should_stop_trading().is_none());
}

#[test]
fn unhedged_share_imbalance_is_refused() {
    let risk = manager(dec!(50));

    assert_eq!(risk.can_add_position(dec!(10), dec!(300), dec!(100)), RiskCheck::Approved);
    assert_eq!(
        risk.can_add_position(dec!(10), dec!(100), dec!(300.5)),
        RiskCheck::Rejected(RiskRejection::UnhedgedExposure {
            unhedged: dec!(200.5),
            limit: dec!(200),
        })
    );
}

#[test]
fn reset_keeps_initial_capital() {
    let mut risk = manager(dec!(50));
    mark_loss(&mut risk, dec!(80));
    risk.reset();

    let state = risk.state();
    assert_eq!(state.unrealized_pnl, Decimal::ZERO);
    assert_eq!(state.current_exposure, Decimal::ZERO);
    assert_eq!(state.initial_capital, dec!(1000));
}
