use serde::{Deserialize, Serialize};

/// Flat ticket pricing. All amounts are in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Price of a single seat
    pub unit_price_cents: i64,

    /// Booking fee added once per order
    pub service_fee_cents: i64,

    pub currency_symbol: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            unit_price_cents: 1200,
            service_fee_cents: 200,
            currency_symbol: "$".to_string(),
        }
    }
}

/// Totals for a booking of `seat_count` seats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    pub seat_count: usize,
    pub seats_cents: i64,
    pub service_fee_cents: i64,
    pub total_cents: i64,
}

#[derive(Debug, Clone)]
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// `seat_count × unit price`
    pub fn seat_total(&self, seat_count: usize) -> i64 {
        seat_count as i64 * self.config.unit_price_cents
    }

    /// Seat total plus the service fee.
    pub fn booking_total(&self, seat_count: usize) -> i64 {
        self.seat_total(seat_count) + self.config.service_fee_cents
    }

    pub fn breakdown(&self, seat_count: usize) -> PriceBreakdown {
        PriceBreakdown {
            seat_count,
            seats_cents: self.seat_total(seat_count),
            service_fee_cents: self.config.service_fee_cents,
            total_cents: self.booking_total(seat_count),
        }
    }

    /// Seat-page format: whole units, no decimals (`$24`).
    pub fn format_whole(&self, cents: i64) -> String {
        format!("{}{}", self.config.currency_symbol, cents / 100)
    }

    /// Checkout format: always two decimals (`$26.00`).
    pub fn format_exact(&self, cents: i64) -> String {
        let sign = if cents < 0 { "-" } else { "" };
        let abs = cents.abs();
        format!(
            "{}{}{}.{:02}",
            sign,
            self.config.currency_symbol,
            abs / 100,
            abs % 100
        )
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(PricingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals() {
        let engine = PricingEngine::default();
        assert_eq!(engine.seat_total(0), 0);
        assert_eq!(engine.seat_total(2), 2400);
        assert_eq!(engine.booking_total(2), 2600);

        let breakdown = engine.breakdown(3);
        assert_eq!(breakdown.seats_cents, 3600);
        assert_eq!(breakdown.total_cents, 3800);
    }

    #[test]
    fn test_formatting() {
        let engine = PricingEngine::default();
        assert_eq!(engine.format_whole(engine.seat_total(2)), "$24");
        assert_eq!(engine.format_whole(0), "$0");
        assert_eq!(engine.format_exact(engine.booking_total(2)), "$26.00");
        assert_eq!(engine.format_exact(1205), "$12.05");
    }

    #[test]
    fn test_custom_currency() {
        let engine = PricingEngine::new(PricingConfig {
            unit_price_cents: 950,
            service_fee_cents: 0,
            currency_symbol: "€".to_string(),
        });
        assert_eq!(engine.format_exact(engine.booking_total(2)), "€19.00");
    }
}
