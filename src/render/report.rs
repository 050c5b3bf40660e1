use serde::Serialize;
use serde_json::Value;

const DEFAULT_VOLUME: &str = "12.4M";
const DEFAULT_DIVIDEND: &str = "1.2%";
const NOT_AVAILABLE: &str = "N/A";

/// Display-ready view of a stockData payload. Every field is already a string
/// for the card template; gaps are filled with the card's defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockReport {
  pub ticker: String,
  pub name: String,
  pub price: String,
  pub is_up: bool,
  pub arrow: String,
  pub change_percent: String,
  pub summary: String,
  pub market_cap: String,
  pub pe_ratio: String,
  pub volume: String,
  pub dividend_yield: String,
  pub low: String,
  pub high: String,
}

impl StockReport {
  /// `None` only when there is nothing card-like to show (not an object).
  pub fn from_value(data: &Value) -> Option<Self> {
    if !data.is_object() {
      return None;
    }

    let price: f64 = number_field(data, "price").unwrap_or(0.0);
    let change: f64 = number_field(data, "change").unwrap_or(0.0);
    let change_percent: f64 = number_field(data, "changePercent").unwrap_or(0.0);
    let is_up: bool = change >= 0.0;
    let ticker: String = text_field(data, "ticker").unwrap_or_else(|| NOT_AVAILABLE.to_string());

    Some(StockReport {
      name: text_field(data, "name").unwrap_or_else(|| ticker.clone()),
      ticker,
      price: format_price(price),
      is_up,
      arrow: if is_up { "▲".to_string() } else { "▼".to_string() },
      change_percent: format!("{}%", number_text(change_percent.abs())),
      summary: text_field(data, "summary").unwrap_or_default(),
      market_cap: text_field(data, "marketCap").unwrap_or_else(|| NOT_AVAILABLE.to_string()),
      pe_ratio: text_field(data, "peRatio").unwrap_or_else(|| NOT_AVAILABLE.to_string()),
      volume: text_field(data, "volume").unwrap_or_else(|| DEFAULT_VOLUME.to_string()),
      dividend_yield: text_field(data, "dividendYield").unwrap_or_else(|| DEFAULT_DIVIDEND.to_string()),
      low: range_bound(data, "fiftyTwoWeekLow", price * 0.8),
      high: range_bound(data, "fiftyTwoWeekHigh", price * 1.2),
    })
  }
}

fn range_bound(data: &Value, key: &str, estimate: f64) -> String {
  match number_field(data, key).filter(|bound| *bound != 0.0) {
    Some(bound) => number_text(bound),
    None => format!("{:.2}", estimate),
  }
}

fn text_field(data: &Value, key: &str) -> Option<String> {
  match data.get(key)? {
    Value::String(text) if !text.is_empty() => Some(text.clone()),
    Value::Number(number) => number.as_f64().map(number_text),
    _ => None,
  }
}

fn number_field(data: &Value, key: &str) -> Option<f64> {
  match data.get(key)? {
    Value::Number(number) => number.as_f64(),
    Value::String(text) => text.trim().trim_start_matches('$').replace(',', "").parse().ok(),
    _ => None,
  }
}

fn number_text(value: f64) -> String {
  if value.fract() == 0.0 && value.abs() < 1e15 {
    return format!("{}", value as i64);
  }
  format!("{}", value)
}

/// Thousands separators, at most three decimals, trailing zeros dropped.
fn format_price(value: f64) -> String {
  let fixed: String = format!("{:.3}", value.abs());
  let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
  let fraction: &str = fraction.trim_end_matches('0');

  let mut grouped: String = String::new();
  for (i, digit) in whole.chars().enumerate() {
    if i > 0 && (whole.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(digit);
  }

  let sign: &str = if value < 0.0 && (grouped != "0" || !fraction.is_empty()) { "-" } else { "" };
  if fraction.is_empty() {
    return format!("{}{}", sign, grouped);
  }
  format!("{}{}.{}", sign, grouped, fraction)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn full_payload() {
    let report = StockReport::from_value(&json!({
      "ticker": "RELIANCE", "name": "Reliance Industries", "price": 2945.5, "change": -12.3, "changePercent": -0.42,
      "summary": "Diversified conglomerate.", "marketCap": "19.9T", "peRatio": "27.1", "dividendYield": "0.3%",
      "volume": "5.1M", "fiftyTwoWeekHigh": 3217.6, "fiftyTwoWeekLow": 2220.3
    })).unwrap();

    assert_eq!(report.price, "2,945.5");
    assert!(!report.is_up);
    assert_eq!(report.arrow, "▼");
    assert_eq!(report.change_percent, "0.42%");
    assert_eq!(report.volume, "5.1M");
    assert_eq!(report.low, "2220.3");
    assert_eq!(report.high, "3217.6");
  }

  #[test]
  fn gaps_use_card_defaults() {
    let report = StockReport::from_value(&json!({"ticker": "AAPL", "price": 100, "change": 0})).unwrap();
    assert!(report.is_up);
    assert_eq!(report.name, "AAPL");
    assert_eq!(report.volume, "12.4M");
    assert_eq!(report.dividend_yield, "1.2%");
    assert_eq!(report.low, "80.00");
    assert_eq!(report.high, "120.00");
    assert_eq!(report.market_cap, "N/A");
  }

  #[test]
  fn numeric_strings_are_accepted() {
    let report = StockReport::from_value(&json!({"price": "$1,020.10", "peRatio": 31.5})).unwrap();
    assert_eq!(report.price, "1,020.1");
    assert_eq!(report.pe_ratio, "31.5");
  }

  #[test]
  fn non_object_has_no_card() {
    assert_eq!(StockReport::from_value(&json!("AAPL")), None);
    assert_eq!(StockReport::from_value(&Value::Null), None);
  }

  #[test]
  fn price_formatting() {
    assert_eq!(format_price(0.0), "0");
    assert_eq!(format_price(999.0), "999");
    assert_eq!(format_price(1234567.891), "1,234,567.891");
    assert_eq!(format_price(182.4), "182.4");
    assert_eq!(format_price(-1500.25), "-1,500.25");
  }
}
