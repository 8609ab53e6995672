#![no_main]

use libfuzzer_sys::fuzz_target;
use spotdash::feed::{FxRates, normalize};
use spotdash::zones;

fuzz_target!(|data: &[u8]| {
    if let Ok(payload) = serde_json::from_slice::<serde_json::Value>(data) {
        let fx = FxRates {
            eur_to_sek: 11.0,
            eur_to_nok: 11.0,
        };
        let _ = normalize(&payload, zones::zone_for(Some("FI")), fx, true);
    }
});
