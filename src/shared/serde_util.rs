//! Custom serde helpers for provider wire formats.

/// Deserializes a nullable or missing number as `0.0`.
///
/// The simple-price endpoint sends `null` for metrics it has no data for
/// (e.g. `usd_24h_change` on freshly listed coins).
pub mod null_as_zero {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
    }
}

/// Deserializes a nullable or missing unix timestamp (seconds) as `0`.
pub mod null_as_epoch {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or_default())
    }
}
