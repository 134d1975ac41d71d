use wasm_bindgen::prelude::*;
use portal_engine::*;

mod portal;
use portal::PaperPortal;

portal_web::export_scene!(PaperPortal, "paper-portal");

/// Text of the current dialogue line (may contain inline markup).
#[wasm_bindgen]
pub fn get_dialogue_text() -> String {
    with_runner(|r| r.scene().dialogue_text().to_string()).unwrap_or_default()
}

/// Whether the bubble shows its "next" hint.
#[wasm_bindgen]
pub fn get_dialogue_has_next() -> bool {
    with_runner(|r| r.scene().shows_next_hint()).unwrap_or(false)
}

/// Whether the character and its bubble are on screen.
#[wasm_bindgen]
pub fn get_character_visible() -> bool {
    with_runner(|r| r.scene().character_visible()).unwrap_or(false)
}
