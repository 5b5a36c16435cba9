//! Per-window stop-loss and unhedged-exposure guard.
//!
//! The risk manager holds no reference to the ledger. Callers pass the
//! quantities and costs in, marking positions to the current **bid** (the
//! price obtainable by closing immediately), never the ask used for entries.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{Price, Volume};

/// Risk limits for one settlement window.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RiskConfig {
    /// Maximum tolerated unrealized loss in dollars.
    #[serde(default = "default_max_loss_per_window")]
    pub max_loss_per_window: Decimal,

    /// Maximum tolerated loss as a fraction of initial capital.
    #[serde(default = "default_max_drawdown_pct")]
    pub max_drawdown_pct: Decimal,

    /// Maximum |YES qty - NO qty| before new positions are refused.
    ///
    /// Configured in dollars but compared against a share count.
    #[serde(default = "default_max_unhedged_exposure")]
    pub max_unhedged_exposure: Decimal,

    /// Capital baseline applied at the start of each window. Falls back to
    /// the strategy's total exposure cap when unset.
    #[serde(default)]
    pub initial_capital: Option<Decimal>,
}

fn default_max_loss_per_window() -> Decimal {
    Decimal::from(50)
}

fn default_max_drawdown_pct() -> Decimal {
    Decimal::new(10, 2) // 10%
}

fn default_max_unhedged_exposure() -> Decimal {
    Decimal::from(200)
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            max_loss_per_window: default_max_loss_per_window(),
            max_drawdown_pct: default_max_drawdown_pct(),
            max_unhedged_exposure: default_max_unhedged_exposure(),
            initial_capital: None,
        }
    }
}

/// Why trading should stop for the rest of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StopReason {
    /// Unrealized loss exceeded the absolute per-window limit.
    MaxLoss { unrealized_pnl: Decimal, limit: Decimal },
    /// Unrealized loss exceeded the drawdown fraction of initial capital.
    MaxDrawdown { drawdown: Decimal, limit: Decimal },
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxLoss { unrealized_pnl, .. } => {
                write!(f, "Max loss reached: ${:.2}", unrealized_pnl)
            }
            Self::MaxDrawdown { drawdown, .. } => {
                write!(f, "Max drawdown reached: {:.1}%", drawdown * Decimal::ONE_HUNDRED)
            }
        }
    }
}

/// Why a new position was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RiskRejection {
    UnhedgedExposure { unhedged: Volume, limit: Decimal },
}

impl fmt::Display for RiskRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnhedgedExposure { unhedged, .. } => {
                write!(f, "Unhedged exposure too high: {:.2}", unhedged)
            }
        }
    }
}

/// Result of a pre-trade risk check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskCheck {
    Approved,
    Rejected(RiskRejection),
}

impl RiskCheck {
    #[must_use]
    pub const fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }

    #[must_use]
    pub const fn rejection(&self) -> Option<&RiskRejection> {
        match self {
            Self::Approved => None,
            Self::Rejected(reason) => Some(reason),
        }
    }
}

/// Risk posture for the current window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskState {
    pub initial_capital: Price,
    pub current_exposure: Price,
    pub unrealized_pnl: Price,
}

/// Mark-to-market stop-loss and exposure guard.
#[derive(Debug, Clone)]
pub struct RiskManager {
    config: RiskConfig,
    state: RiskState,
}

impl RiskManager {
    #[must_use]
    pub fn new(config: RiskConfig) -> Self {
        Self {
            config,
            state: RiskState::default(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &RiskConfig {
        &self.config
    }

    #[must_use]
    pub const fn state(&self) -> RiskState {
        self.state
    }

    /// Set the capital baseline for the window.
    pub fn set_initial_capital(&mut self, capital: Price) {
        self.state.initial_capital = capital;
    }

    /// Recompute exposure and unrealized P&L, marking holdings to the bids.
    pub fn update_exposure(
        &mut self,
        yes_qty: Volume,
        yes_cost: Price,
        no_qty: Volume,
        no_cost: Price,
        yes_bid: Price,
        no_bid: Price,
    ) {
        let exposure = yes_cost + no_cost;
        let mark = yes_qty * yes_bid + no_qty * no_bid;

        self.state.current_exposure = exposure;
        self.state.unrealized_pnl = mark - exposure;
    }

    /// First tripped stop condition, if any.
    ///
    /// The absolute loss limit is checked before the drawdown fraction. Both
    /// comparisons are strict.
    #[must_use]
    pub fn should_stop_trading(&self) -> Option<StopReason> {
        let pnl = self.state.unrealized_pnl;

        if pnl < -self.config.max_loss_per_window {
            warn!(pnl = %pnl, limit = %self.config.max_loss_per_window, "Max loss reached");
            return Some(StopReason::MaxLoss {
                unrealized_pnl: pnl,
                limit: self.config.max_loss_per_window,
            });
        }

        let capital = self.state.initial_capital;
        if capital > Decimal::ZERO {
            let drawdown = -pnl / capital;
            if drawdown > self.config.max_drawdown_pct {
                warn!(
                    drawdown = %drawdown.round_dp(4),
                    limit = %self.config.max_drawdown_pct,
                    "Max drawdown reached"
                );
                return Some(StopReason::MaxDrawdown {
                    drawdown,
                    limit: self.config.max_drawdown_pct,
                });
            }
        }

        None
    }

    /// Whether another purchase may be added given current quantities.
    ///
    /// `_new_cost` is accepted for interface parity; only the share-count
    /// imbalance is checked.
    #[must_use]
    pub fn can_add_position(&self, _new_cost: Price, yes_qty: Volume, no_qty: Volume) -> RiskCheck {
        let unhedged = (yes_qty - no_qty).abs();
        if unhedged > self.config.max_unhedged_exposure {
            return RiskCheck::Rejected(RiskRejection::UnhedgedExposure {
                unhedged,
                limit: self.config.max_unhedged_exposure,
            });
        }
        RiskCheck::Approved
    }

    /// Clear exposure and P&L. Initial capital is kept.
    pub fn reset(&mut self) {
        self.state.current_exposure = Decimal::ZERO;
        self.state.unrealized_pnl = Decimal::ZERO;
        info!("Risk state reset");
    }
}

impl Default for RiskManager {
    fn default() -> Self {
        Self::new(RiskConfig::default())
    }
}
