use std::collections::HashMap;
use serde::{Deserialize, Serialize};

use crate::systems::dialogue::DialogueLine;
use crate::systems::drag_rotation::DragConfig;
use crate::systems::portal::PortalConfig;
use crate::systems::wheel_scale::WheelScaleConfig;

/// Everything a scene loads at startup, as one JSON document:
/// texture paths, the dialogue script, and optional tuning overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneManifest {
    /// Named textures: name → path relative to the asset root.
    #[serde(default)]
    pub textures: HashMap<String, TextureDescriptor>,
    /// Ordered dialogue script for the guide character.
    #[serde(default)]
    pub dialogues: Vec<DialogueLine>,
    #[serde(default)]
    pub portal: Option<PortalConfig>,
    #[serde(default)]
    pub wheel: Option<WheelScaleConfig>,
    #[serde(default)]
    pub drag: Option<DragConfig>,
}

/// Describes a single texture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextureDescriptor {
    /// Relative path to the image (e.g., "yoonu-back.png").
    pub path: String,
    /// Numeric index the host uses for this texture. Assigned in name order
    /// by the registry when omitted.
    #[serde(default)]
    pub index: Option<u32>,
}

impl SceneManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_manifest() {
        let json = r#"{
            "textures": {
                "front": { "path": "yoonu-full.png", "index": 0 },
                "back": { "path": "yoonu-back.png" }
            },
            "dialogues": [
                { "id": "hello", "text": "Hi!" },
                { "id": "goodbye", "text": "Bye", "action": "close_portal", "motion": "nod" }
            ],
            "portal": { "layer_count": 5 }
        }"#;
        let manifest = SceneManifest::from_json(json).unwrap();
        assert_eq!(manifest.textures.len(), 2);
        assert_eq!(manifest.textures["front"].index, Some(0));
        assert_eq!(manifest.textures["back"].index, None);
        assert_eq!(manifest.dialogues.len(), 2);
        assert_eq!(manifest.dialogues[1].action.as_deref(), Some("close_portal"));

        let portal = manifest.portal.unwrap();
        assert_eq!(portal.layer_count, 5);
        // Unspecified fields fall back to defaults.
        assert_eq!(portal.close_delay, PortalConfig::default().close_delay);
    }

    #[test]
    fn parse_empty_manifest() {
        let manifest = SceneManifest::from_json("{}").unwrap();
        assert!(manifest.textures.is_empty());
        assert!(manifest.dialogues.is_empty());
        assert!(manifest.wheel.is_none());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(SceneManifest::from_json(r#"{"textures": 3}"#).is_err());
    }
}
