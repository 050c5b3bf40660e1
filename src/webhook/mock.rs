use serde_json::{json, Value};

/// Canned reply used when the app runs without any webhook behind it.
pub fn mock_payload(query: &str) -> Value {
  let ticker: String = mock_ticker(query);
  let name: &str = query.trim();

  let analysis: String = format!(
    "## {name} ({ticker})\n\n\
     This is a **mock analysis** generated locally; no analysis workflow was called.\n\n\
     | Metric | Value |\n\
     |---|---|\n\
     | Price | $182.40 |\n\
     | P/E | 28.4 |\n\
     | Market Cap | 2.81T |\n\n\
     - Momentum: positive over the last quarter\n\
     - Valuation: above sector average\n\n\
     > Set `N8N_WEBHOOK_URL` to get a real analysis.",
    name = name,
    ticker = ticker,
  );

  json!({
    "analysis": analysis,
    "stockData": {
      "ticker": ticker,
      "name": name,
      "price": 182.4,
      "change": 2.15,
      "changePercent": 1.19,
      "summary": format!("Mock summary for {}. Figures are placeholders.", name),
      "marketCap": "2.81T",
      "peRatio": "28.4",
      "dividendYield": "0.5%",
      "volume": "54.2M",
      "fiftyTwoWeekHigh": 199.62,
      "fiftyTwoWeekLow": 164.08,
    }
  })
}

fn mock_ticker(query: &str) -> String {
  let ticker: String = query.chars().filter(|c| c.is_ascii_alphanumeric()).take(5).collect::<String>().to_ascii_uppercase();
  if ticker.is_empty() {
    return "DEMO".to_string();
  }
  return ticker;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ticker_comes_from_query() {
    let payload: Value = mock_payload("reliance industries");
    assert_eq!(payload["stockData"]["ticker"], "RELIA");
    assert_eq!(payload["stockData"]["name"], "reliance industries");
    assert!(payload["analysis"].as_str().unwrap().contains("RELIA"));
  }

  #[test]
  fn symbols_only_query_gets_placeholder_ticker() {
    assert_eq!(mock_payload("$$$")["stockData"]["ticker"], "DEMO");
  }
}
