//! Country normalization and dial codes for the supported set.
//!
//! Runner scripts pass countries as free-form strings ("canada", "UK",
//! "fr"). Everything is canonicalized to an [`isocountry::CountryCode`]
//! before a lease is acquired. The tables below are configuration, not
//! logic: the supported set is fixed by which countries the provisioning
//! flow has device-side handling for.

use crate::types::DialCode;
use isocountry::CountryCode;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use thiserror::Error;

/// Error when normalizing a country argument.
#[derive(Debug, Clone, Error)]
pub enum CountryError {
    /// The input did not match any supported country name or code.
    #[error("unsupported country '{input}'")]
    Unsupported { input: String },
}

/// Countries the provisioning flow supports.
pub const SUPPORTED_COUNTRIES: &[CountryCode] = &[
    CountryCode::FRA,
    CountryCode::GBR,
    CountryCode::USA,
    CountryCode::CAN,
    CountryCode::DEU,
    CountryCode::ESP,
    CountryCode::PHL,
];

/// Lowercase alias -> canonical country.
static ALIASES: Lazy<HashMap<&'static str, CountryCode>> = Lazy::new(|| {
    use CountryCode::*;
    HashMap::from([
        ("fr", FRA),
        ("fra", FRA),
        ("france", FRA),
        ("uk", GBR),
        ("gb", GBR),
        ("gbr", GBR),
        ("united kingdom", GBR),
        ("us", USA),
        ("usa", USA),
        ("united states", USA),
        ("ca", CAN),
        ("can", CAN),
        ("canada", CAN),
        ("de", DEU),
        ("deu", DEU),
        ("germany", DEU),
        ("es", ESP),
        ("esp", ESP),
        ("spain", ESP),
        ("ph", PHL),
        ("phl", PHL),
        ("philippines", PHL),
    ])
});

/// Dial codes for the supported set.
static DIAL_CODES: Lazy<HashMap<CountryCode, &'static str>> = Lazy::new(|| {
    use CountryCode::*;
    HashMap::from([
        (FRA, "33"),
        (GBR, "44"),
        (USA, "1"),
        (CAN, "1"),
        (DEU, "49"),
        (ESP, "34"),
        (PHL, "63"),
    ])
});

/// Canonicalize a free-form country argument.
///
/// Accepts ISO alpha-2/alpha-3 codes and common English names,
/// case-insensitively. Pure function over a fixed table.
///
/// # Example
///
/// ```rust
/// use account_provisioner::country::normalize_country;
/// use isocountry::CountryCode;
///
/// assert_eq!(normalize_country("Canada").unwrap(), CountryCode::CAN);
/// assert_eq!(normalize_country("uk").unwrap(), CountryCode::GBR);
/// ```
pub fn normalize_country(input: &str) -> Result<CountryCode, CountryError> {
    let key = input.trim().to_ascii_lowercase();
    ALIASES
        .get(key.as_str())
        .copied()
        .ok_or_else(|| CountryError::Unsupported {
            input: input.to_string(),
        })
}

/// Dial code for a supported country, `None` outside the supported set.
pub fn dial_code_for(country: CountryCode) -> Option<DialCode> {
    let code = DIAL_CODES.get(&country)?;
    // Table entries are digit-only literals.
    DialCode::new(code).ok()
}

/// True if the country has device-side handling.
pub fn is_supported(country: CountryCode) -> bool {
    SUPPORTED_COUNTRIES.contains(&country)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_names_and_codes() {
        assert_eq!(normalize_country("CANADA").unwrap(), CountryCode::CAN);
        assert_eq!(normalize_country("uk").unwrap(), CountryCode::GBR);
        assert_eq!(normalize_country(" France ").unwrap(), CountryCode::FRA);
        assert_eq!(normalize_country("us").unwrap(), CountryCode::USA);
    }

    #[test]
    fn test_normalize_rejects_unknown() {
        assert!(normalize_country("atlantis").is_err());
        assert!(normalize_country("").is_err());
    }

    #[test]
    fn test_dial_codes() {
        assert_eq!(
            dial_code_for(CountryCode::GBR).map(|d| d.to_string()),
            Some("44".to_string())
        );
        assert_eq!(
            dial_code_for(CountryCode::CAN).map(|d| d.to_string()),
            Some("1".to_string())
        );
        assert_eq!(dial_code_for(CountryCode::UKR), None);
    }

    #[test]
    fn test_supported_set_is_closed() {
        for &country in SUPPORTED_COUNTRIES {
            assert!(is_supported(country));
            assert!(dial_code_for(country).is_some());
        }
        assert!(!is_supported(CountryCode::JPN));
    }
}
