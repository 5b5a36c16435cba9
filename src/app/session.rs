//! One settlement window's worth of decision state.
//!
//! A [`WindowSession`] owns the ledger, analyzer, risk manager and engine for
//! the active window and runs them in a fixed order on every tick. It never
//! performs I/O: the caller fetches quotes, executes any [`TradeIntent`] and
//! reports confirmed fills back through [`WindowSession::record_fill`].

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::domain::{
    AnalyzerStats, ArbitrageEngine, DomainError, Fill, Ledger, LedgerSnapshot, MarketId,
    MarketWindow, Price, PriceAnalyzer, RiskCheck, RiskManager, RiskRejection, RiskState, Side,
    StopReason, TradeSignal, Volume,
};
use crate::port::QuotePair;

/// Why a tick was skipped without touching any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// At least one side had no ask.
    MissingQuote,
    /// An ask was outside (0, 1).
    InvalidQuote,
}

/// A buy the caller should attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeIntent {
    pub signal: TradeSignal,
    /// Analyzer confidence when it flagged the same side as cheap.
    pub confidence: Option<Decimal>,
}

/// Outcome of one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "decision", content = "detail", rename_all = "snake_case")]
pub enum TickDecision {
    Skip(SkipReason),
    /// Trading is stopped for the rest of the window.
    Halt(StopReason),
    Hold,
    Blocked(RiskRejection),
    Trade(TradeIntent),
}

impl TickDecision {
    #[must_use]
    pub const fn intent(&self) -> Option<&TradeIntent> {
        match self {
            Self::Trade(intent) => Some(intent),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_halt(&self) -> bool {
        matches!(self, Self::Halt(_))
    }
}

/// End-of-window (or in-flight) status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowSummary {
    pub market_id: Option<MarketId>,
    pub ticks: u64,
    pub opportunities: u64,
    pub signals: u64,
    pub fills: u64,
    pub ledger: LedgerSnapshot,
    pub risk: RiskState,
    pub analyzer: AnalyzerStats,
    pub halted: Option<StopReason>,
    pub profit_locked: bool,
}

/// Decision state for the active window.
#[derive(Debug)]
pub struct WindowSession {
    ledger: Ledger,
    analyzer: PriceAnalyzer,
    risk: RiskManager,
    engine: ArbitrageEngine,
    initial_capital: Price,
    market: Option<MarketWindow>,
    halted: Option<StopReason>,
    ticks: u64,
    opportunities: u64,
    signals: u64,
    fills: u64,
}

impl WindowSession {
    /// Build every component from one configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let initial_capital = config.initial_capital();
        let mut risk = RiskManager::new(config.risk.clone());
        risk.set_initial_capital(initial_capital);

        Self {
            ledger: Ledger::new(),
            analyzer: PriceAnalyzer::new(config.analyzer.clone()),
            risk,
            engine: ArbitrageEngine::new(config.strategy.clone()),
            initial_capital,
            market: None,
            halted: None,
            ticks: 0,
            opportunities: 0,
            signals: 0,
            fills: 0,
        }
    }

    /// Reset every component and start trading `market`.
    pub fn begin_window(&mut self, market: MarketWindow) {
        self.ledger.reset();
        self.analyzer.reset();
        self.risk.reset();
        self.risk.set_initial_capital(self.initial_capital);
        self.halted = None;
        self.ticks = 0;
        self.opportunities = 0;
        self.signals = 0;
        self.fills = 0;

        info!(
            market_id = %market.market_id(),
            question = %market.question(),
            end_time = %market.end_time(),
            "Window started"
        );
        self.market = Some(market);
    }

    /// Run one decision pass over the latest quotes.
    pub fn tick(&mut self, quotes: &QuotePair) -> TickDecision {
        if let Some(reason) = self.halted {
            return TickDecision::Halt(reason);
        }

        let (Some(yes_ask), Some(no_ask)) = (quotes.ask(Side::Yes), quotes.ask(Side::No)) else {
            debug!("Missing ask, skipping tick");
            return TickDecision::Skip(SkipReason::MissingQuote);
        };
        if !is_tradeable_price(yes_ask) || !is_tradeable_price(no_ask) {
            warn!(yes_ask = %yes_ask, no_ask = %no_ask, "Ask outside (0, 1), skipping tick");
            return TickDecision::Skip(SkipReason::InvalidQuote);
        }

        self.ticks += 1;

        if let (Some(yes_bid), Some(no_bid)) = (quotes.bid(Side::Yes), quotes.bid(Side::No)) {
            let yes = self.ledger.position(Side::Yes);
            let no = self.ledger.position(Side::No);
            self.risk.update_exposure(
                yes.quantity(),
                yes.total_cost(),
                no.quantity(),
                no.total_cost(),
                yes_bid,
                no_bid,
            );
            if let Some(reason) = self.risk.should_stop_trading() {
                warn!(reason = %reason, "Trading halted for this window");
                self.halted = Some(reason);
                return TickDecision::Halt(reason);
            }
        }

        let opportunity = self.analyzer.get_opportunity(yes_ask, no_ask);
        if opportunity.is_some() {
            self.opportunities += 1;
        }

        let Some(signal) = self.engine.analyze_opportunity(&self.ledger, yes_ask, no_ask) else {
            return TickDecision::Hold;
        };

        let check = self.risk.can_add_position(
            signal.cost(),
            self.ledger.position(Side::Yes).quantity(),
            self.ledger.position(Side::No).quantity(),
        );
        if let RiskCheck::Rejected(reason) = check {
            info!(side = %signal.side, reason = %reason, "Signal blocked by risk");
            return TickDecision::Blocked(reason);
        }

        self.signals += 1;
        let confidence = opportunity
            .filter(|opportunity| opportunity.side == signal.side)
            .map(|opportunity| opportunity.confidence);

        debug!(
            side = %signal.side,
            price = %signal.price,
            quantity = %signal.quantity.round_dp(2),
            projected_pair_cost = %signal.projected_pair_cost.round_dp(4),
            "Trade signal"
        );
        TickDecision::Trade(TradeIntent { signal, confidence })
    }

    /// Record a confirmed fill against the ledger.
    ///
    /// # Errors
    ///
    /// Propagates [`DomainError::InvalidFill`] from the ledger.
    pub fn record_fill(
        &mut self,
        side: Side,
        quantity: Volume,
        price: Price,
    ) -> Result<Fill, DomainError> {
        let fill = self.ledger.record_fill(side, quantity, price)?.clone();
        self.fills += 1;
        Ok(fill)
    }

    /// Whether the locked profit target has been reached with enough balance.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.engine.is_profit_locked(&self.ledger)
    }

    /// Whether the total exposure cap has been spent.
    #[must_use]
    pub fn is_exposure_exhausted(&self) -> bool {
        self.ledger.total_cost() >= self.engine.config().max_total_exposure
    }

    #[must_use]
    pub const fn halted(&self) -> Option<StopReason> {
        self.halted
    }

    #[must_use]
    pub const fn market(&self) -> Option<&MarketWindow> {
        self.market.as_ref()
    }

    #[must_use]
    pub const fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    #[must_use]
    pub const fn analyzer(&self) -> &PriceAnalyzer {
        &self.analyzer
    }

    #[must_use]
    pub const fn risk(&self) -> &RiskManager {
        &self.risk
    }

    #[must_use]
    pub const fn engine(&self) -> &ArbitrageEngine {
        &self.engine
    }

    #[must_use]
    pub fn summary(&self) -> WindowSummary {
        WindowSummary {
            market_id: self.market.as_ref().map(|m| m.market_id().clone()),
            ticks: self.ticks,
            opportunities: self.opportunities,
            signals: self.signals,
            fills: self.fills,
            ledger: self.ledger.snapshot(),
            risk: self.risk.state(),
            analyzer: self.analyzer.stats(),
            halted: self.halted,
            profit_locked: self.is_complete(),
        }
    }
}

fn is_tradeable_price(price: Price) -> bool {
    price > Decimal::ZERO && price < Decimal::ONE
}
