use wasm_bindgen::prelude::*;
use portal_engine::*;

mod molecule;
mod scene;
use scene::StrengthMolecule;

portal_web::export_scene!(StrengthMolecule, "strength-molecule");

/// Name of the strength at `index`, for the host's tooltip.
#[wasm_bindgen]
pub fn get_strength_name(index: u32) -> String {
    molecule::STRENGTHS
        .get(index as usize)
        .map(|s| s.name.to_string())
        .unwrap_or_default()
}
