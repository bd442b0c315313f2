//! WASM bindings for running tournaments in the browser

#![cfg(feature = "wasm")]

use wasm_bindgen::prelude::*;

use crate::pairing::{match_count, match_index, pairing_for_match};
use crate::{DesignGame, PayoffMatrix, PlayerSpec, TournamentConfig};

/// Run a full tournament
///
/// # Arguments
/// * `config_json` - JSON serialized TournamentConfig
///
/// # Returns
/// JSON serialized TournamentReport
#[wasm_bindgen]
pub fn run_tournament(config_json: &str) -> Result<JsValue, JsError> {
    let config = TournamentConfig::from_json(config_json)
        .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?;
    let mut tournament = config
        .into_tournament()
        .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?;

    tournament.run();

    serde_wasm_bindgen::to_value(&tournament.report())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Play a single round between two players on a list of designs
///
/// # Returns
/// JSON serialized PlayResult from player A's side
#[wasm_bindgen]
pub fn play_once(
    designs_json: &str,
    player_a_json: &str,
    player_b_json: &str,
) -> Result<JsValue, JsError> {
    let designs: Vec<PayoffMatrix> = serde_json::from_str(designs_json)
        .map_err(|e| JsError::new(&format!("Invalid designs: {}", e)))?;
    let spec_a: PlayerSpec = serde_json::from_str(player_a_json)
        .map_err(|e| JsError::new(&format!("Invalid player A: {}", e)))?;
    let spec_b: PlayerSpec = serde_json::from_str(player_b_json)
        .map_err(|e| JsError::new(&format!("Invalid player B: {}", e)))?;

    let game = DesignGame::new(designs);
    let mut player_a = spec_a.build(game.clone());
    let mut player_b = spec_b.build(game.clone());
    let result = game
        .play(player_a.as_mut(), player_b.as_mut())
        .map_err(|e| JsError::new(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Get human-readable description of a player
#[wasm_bindgen]
pub fn describe_player(spec_json: &str) -> Result<String, JsError> {
    let spec: PlayerSpec = serde_json::from_str(spec_json)
        .map_err(|e| JsError::new(&format!("Invalid player: {}", e)))?;

    Ok(spec.describe())
}

#[derive(serde::Serialize)]
struct PresetInfo {
    name: String,
    description: String,
    spec: PlayerSpec,
}

/// Get all named player presets, baselines first
#[wasm_bindgen]
pub fn get_player_presets() -> Result<JsValue, JsError> {
    let specs = [PlayerSpec::null(), PlayerSpec::random(0), PlayerSpec::mirror(0)]
        .into_iter()
        .chain(PlayerSpec::presets());
    let presets: Vec<PresetInfo> = specs
        .map(|spec| PresetInfo {
            name: spec.name().to_string(),
            description: spec.describe(),
            spec,
        })
        .collect();

    serde_wasm_bindgen::to_value(&presets)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Get the pairing played at a given position of the round robin
///
/// # Returns
/// `[a, b]` player indices with `a <= b`, or null past the last match
#[wasm_bindgen]
pub fn get_match_pairing(participant_count: usize, index: usize) -> Result<JsValue, JsError> {
    let pairing = pairing_for_match(participant_count, index);

    serde_wasm_bindgen::to_value(&pairing)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Get the round-robin position of the match between players `a` and `b`
#[wasm_bindgen]
pub fn get_match_index(participant_count: usize, a: usize, b: usize) -> Result<usize, JsError> {
    match_index(participant_count, a, b).ok_or_else(|| {
        JsError::new(&format!(
            "No player {} in a {}-player tournament",
            a.max(b),
            participant_count
        ))
    })
}

/// Get total match count for a round robin including self-pairs
#[wasm_bindgen]
pub fn get_match_count(participant_count: usize) -> usize {
    match_count(participant_count)
}
