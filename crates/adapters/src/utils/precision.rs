use rust_decimal::{Decimal, RoundingStrategy};

/// Truncates an order size to the market's amount precision
pub fn amount_to_precision(amount: Decimal, places: Option<u32>) -> String {
    match places {
        Some(dp) => amount.round_dp_with_strategy(dp, RoundingStrategy::ToZero),
        None => amount,
    }
    .normalize()
    .to_string()
}

/// Rounds a price half-away-from-zero to the market's price precision
pub fn price_to_precision(price: Decimal, places: Option<u32>) -> String {
    match places {
        Some(dp) => price.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero),
        None => price,
    }
    .normalize()
    .to_string()
}
