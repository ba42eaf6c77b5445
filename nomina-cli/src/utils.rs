use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a command-line amount cannot be used.
#[derive(Debug, Error)]
pub enum ParseAmountError {
    #[error("invalid amount '{input}': {source}")]
    Invalid {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("amount '{0}' must not be negative")]
    Negative(String),
}

/// Trims whitespace and removes the thousands separators `,` and `_`.
fn normalize_amount_input(s: &str) -> String {
    s.trim().replace([',', '_'], "")
}

/// Parses a euro amount for clap.
///
/// Accepts `,` and `_` as thousands separators (`"1,234.56"`, `"30_000"`).
/// Empty input is 0. Negative amounts are rejected.
pub fn parse_amount(s: &str) -> Result<Decimal, ParseAmountError> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let amount: Decimal = normalized.parse().map_err(|e| {
        tracing::debug!(input = %s, "invalid amount: {}", e);
        ParseAmountError::Invalid {
            input: s.to_string(),
            source: e,
        }
    })?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ParseAmountError::Negative(s.to_string()));
    }
    Ok(amount)
}
