use std::collections::HashMap;
use crate::api::types::TextureId;
use crate::assets::manifest::SceneManifest;

/// Name → texture index lookup built from a SceneManifest.
pub struct TextureRegistry {
    textures: HashMap<String, (TextureId, String)>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
        }
    }

    /// Build a registry from a parsed manifest. Textures without an explicit
    /// index are numbered after the explicit ones, in name order.
    pub fn from_manifest(manifest: &SceneManifest) -> Self {
        let mut names: Vec<&String> = manifest.textures.keys().collect();
        names.sort();

        let mut next = manifest
            .textures
            .values()
            .filter_map(|t| t.index)
            .max()
            .map_or(0, |m| m + 1);

        let mut textures = HashMap::with_capacity(names.len());
        for name in names {
            let desc = &manifest.textures[name];
            let id = match desc.index {
                Some(i) => TextureId(i),
                None => {
                    let id = TextureId(next);
                    next += 1;
                    id
                }
            };
            textures.insert(name.clone(), (id, desc.path.clone()));
        }
        Self { textures }
    }

    /// Look up a texture by name.
    pub fn get(&self, name: &str) -> Option<TextureId> {
        self.textures.get(name).map(|(id, _)| *id)
    }

    /// Look up the name registered for a path (asset failure reports come
    /// back from the host by path).
    pub fn name_for_path(&self, path: &str) -> Option<&str> {
        self.textures
            .iter()
            .find(|(_, (_, p))| p == path)
            .map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl Default for TextureRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_missing_indices_after_explicit_ones() {
        let json = r#"{
            "textures": {
                "front": { "path": "front.png", "index": 3 },
                "back": { "path": "back.png" },
                "glow": { "path": "glow.png" }
            }
        }"#;
        let manifest = SceneManifest::from_json(json).unwrap();
        let reg = TextureRegistry::from_manifest(&manifest);

        assert_eq!(reg.get("front"), Some(TextureId(3)));
        assert_eq!(reg.get("back"), Some(TextureId(4)));
        assert_eq!(reg.get("glow"), Some(TextureId(5)));
        assert_eq!(reg.name_for_path("back.png"), Some("back"));
    }

    #[test]
    fn unknown_returns_none() {
        let reg = TextureRegistry::new();
        assert!(reg.get("nonexistent").is_none());
        assert!(reg.is_empty());
    }
}
