/// Maps legacy or venue-specific tickers onto the common code
pub fn common_currency_code(code: &str) -> String {
    let upper = code.to_uppercase();
    match upper.as_str() {
        "XBT" => "BTC".to_string(),
        "BCC" | "BCHABC" => "BCH".to_string(),
        "DRK" => "DASH".to_string(),
        "BCHSV" => "BSV".to_string(),
        _ => upper,
    }
}

/// Extracts the currency code from a composite `<CODE>/<issuer>` asset id
pub fn asset_code(asset_id: &str) -> String {
    let code = asset_id.split('/').next().unwrap_or(asset_id);
    common_currency_code(code)
}
