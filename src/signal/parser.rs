//! Signal line grammar
//!
//! ```text
//! DIRECTION KIND SYMBOL RISK% ENTRY SL TP
//! ```
//!
//! Tokens are whitespace separated and the whole line must match: anything
//! after the take-profit token rejects the line.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::common::errors::ParseError;
use crate::common::types::{Direction, OrderKind, TradeIntent};

/// Parse one line of chat text into a trade intent
///
/// Direction and kind keywords are case-insensitive. Prices are unsigned
/// decimal literals without exponent (`2750`, `2750.00`, `.5`). The risk token
/// is a positive unsigned decimal immediately followed by `%`.
pub fn parse_signal(line: &str) -> std::result::Result<TradeIntent, ParseError> {
    let mut tokens = line.split_whitespace();

    let token = tokens.next().ok_or(ParseError::Empty)?;
    let direction = Direction::from_str(token)
        .map_err(|_| ParseError::Direction(token.to_string()))?;

    let token = tokens.next().ok_or(ParseError::MissingField("order kind"))?;
    let kind = OrderKind::from_str(token).map_err(|_| ParseError::Kind(token.to_string()))?;

    let symbol = tokens.next().ok_or(ParseError::MissingField("symbol"))?;
    if !is_word(symbol) {
        return Err(ParseError::Symbol(symbol.to_string()));
    }

    let token = tokens.next().ok_or(ParseError::MissingField("risk percentage"))?;
    let risk_percent = token
        .strip_suffix('%')
        .filter(|literal| is_risk_literal(literal))
        .and_then(|literal| Decimal::from_str(literal).ok())
        .filter(|risk| !risk.is_zero())
        .ok_or_else(|| ParseError::Risk(token.to_string()))?;

    let entry_price = parse_price("entry", tokens.next())?;
    let stop_loss = parse_price("stop loss", tokens.next())?;
    let take_profit = parse_price("take profit", tokens.next())?;

    if let Some(extra) = tokens.next() {
        return Err(ParseError::TrailingInput(extra.to_string()));
    }

    Ok(TradeIntent::new(
        direction,
        kind,
        symbol,
        risk_percent,
        entry_price,
        stop_loss,
        take_profit,
    ))
}

fn parse_price(field: &'static str, token: Option<&str>) -> std::result::Result<Decimal, ParseError> {
    let token = token.ok_or(ParseError::MissingField(field))?;
    let invalid = || ParseError::Price {
        field,
        value: token.to_string(),
    };

    if !is_price_literal(token) {
        return Err(invalid());
    }

    // `.5` style literals
    let normalized = if token.starts_with('.') {
        format!("0{}", token)
    } else {
        token.to_string()
    };

    Decimal::from_str(&normalized).map_err(|_| invalid())
}

fn is_word(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_alphanumeric() || c == '_')
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// `\d+(\.\d+)?`
fn is_risk_literal(s: &str) -> bool {
    match s.split_once('.') {
        Some((int, frac)) => all_digits(int) && all_digits(frac),
        None => all_digits(s),
    }
}

/// `\d*\.?\d+`
fn is_price_literal(s: &str) -> bool {
    match s.split_once('.') {
        Some((int, frac)) => (int.is_empty() || all_digits(int)) && all_digits(frac),
        None => all_digits(s),
    }
}
