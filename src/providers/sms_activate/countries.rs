//! ISO country to SMS Activate numeric ID mapping.
//!
//! The provider addresses countries by its own numeric IDs. Only the
//! countries the provisioning flow supports are mapped; the full
//! provider catalogue is irrelevant here.

use isocountry::CountryCode;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// ISO country -> SMS Activate country ID.
pub(crate) static COUNTRY_IDS: Lazy<HashMap<CountryCode, u16>> = Lazy::new(|| {
    use CountryCode::*;
    HashMap::from([
        (PHL, 4),
        (GBR, 16),
        (CAN, 36),
        (DEU, 43),
        (ESP, 56),
        (FRA, 78),
        (USA, 187),
    ])
});

/// Look up the provider ID for a country.
pub fn sms_activate_id(country: CountryCode) -> Option<u16> {
    COUNTRY_IDS.get(&country).copied()
}
