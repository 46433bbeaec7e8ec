/// Prices feed ln() and 1/x, so both of those must come out finite as well.
/// Subnormal prices fail here: their reciprocal overflows.
pub fn is_valid_price(price: f64) -> bool {
    price > 0.0 && price.is_finite() && price.ln().is_finite() && price.recip().is_finite()
}

/// Normalise an asset display name for storage ("Bitcoin Cash" -> "Bitcoin_Cash")
pub fn storage_name(name: &str) -> String {
    name.replace(' ', "_")
}
