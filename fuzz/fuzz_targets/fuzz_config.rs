#![no_main]

//! Match configuration fuzzer.
//!
//! Arbitrary text must either be rejected with an error or yield a
//! configuration that sets up a match and survives a save and reload.

use libfuzzer_sys::fuzz_target;
use skyguard::{MatchConfig, MatchState};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = MatchConfig::from_json_str(text) else {
        return;
    };

    let state = MatchState::new(&config).expect("validated config must set up a match");
    assert_eq!(state.lives, config.starting_lives);
    assert!(state.victory_wave >= 1);

    let saved = serde_json::to_string(&config).expect("config serializes");
    let reloaded = MatchConfig::from_json_str(&saved).expect("saved config reloads");
    assert_eq!(reloaded, config);
});
