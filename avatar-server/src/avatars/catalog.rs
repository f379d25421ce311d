//! Built-in avatar catalog.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Query string that asks ReadyPlayerMe for the morph targets lip sync and
/// expressions need.
pub const MORPH_PARAMS: &str = "?morphTargets=ARKit,Oculus+Visemes,mouthOpen,mouthSmile,eyesClosed,eyesLookUp,eyesLookDown&textureSizeLimit=1024&textureFormat=png&pose=T";

const READY_PLAYER_ME_HOST: &str = "readyplayer.me";

/// Catalog id whose display name is fixed regardless of custom metadata.
pub const DEFAULT_AVATAR_ID: &str = "avatar_default";

/// A downloadable avatar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarEntry {
    pub name: String,
    /// `"F"` or `"M"`.
    pub gender: String,
    pub url: String,
}

impl AvatarEntry {
    pub fn new(name: impl Into<String>, gender: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gender: gender.into(),
            url: url.into(),
        }
    }
}

fn ready_player_me(model_id: &str) -> String {
    format!("https://models.readyplayer.me/{model_id}.glb{MORPH_PARAMS}")
}

/// The avatars shipped with the application, keyed by id.
pub fn builtin() -> BTreeMap<String, AvatarEntry> {
    [
        (
            DEFAULT_AVATAR_ID,
            AvatarEntry::new("Femenino Realista", "F", ready_player_me("64bfa15f0e72c63d7c3934a6")),
        ),
        (
            "avatar_f2",
            AvatarEntry::new("Mara Femenina", "F", ready_player_me("63bc9cb9c0c20de6c48cd8f8")),
        ),
        (
            "avatar_male",
            AvatarEntry::new("Masculino Realista", "M", ready_player_me("64bfa4a6ce0a8563cd28148e")),
        ),
    ]
    .into_iter()
    .map(|(id, entry)| (id.to_string(), entry))
    .collect()
}

/// Add the morph-target query to bare ReadyPlayerMe links.
///
/// URLs that already carry a query, or point elsewhere, are left as given.
pub fn with_morph_targets(url: &str) -> String {
    if url.contains(READY_PLAYER_ME_HOST) && !url.contains('?') {
        format!("{url}{MORPH_PARAMS}")
    } else {
        url.to_string()
    }
}

/// Display name derived from a file stem: `my_avatar` becomes `My Avatar`.
pub fn title_case(id: &str) -> String {
    id.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_three_avatars() {
        let catalog = builtin();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog["avatar_male"].gender, "M");
        assert!(catalog[DEFAULT_AVATAR_ID].url.ends_with(MORPH_PARAMS));
        assert!(
            catalog["avatar_f2"]
                .url
                .starts_with("https://models.readyplayer.me/63bc9cb9c0c20de6c48cd8f8.glb?")
        );
    }

    #[test]
    fn morph_targets_only_for_bare_rpm_links() {
        let bare = "https://models.readyplayer.me/abc.glb";
        assert_eq!(with_morph_targets(bare), format!("{bare}{MORPH_PARAMS}"));

        let with_query = "https://models.readyplayer.me/abc.glb?pose=A";
        assert_eq!(with_morph_targets(with_query), with_query);

        let other = "https://example.com/abc.glb";
        assert_eq!(with_morph_targets(other), other);
    }

    #[test]
    fn title_case_splits_underscores() {
        assert_eq!(title_case("avatar_f2"), "Avatar F2");
        assert_eq!(title_case("MI_AVATAR"), "Mi Avatar");
        assert_eq!(title_case("solo"), "Solo");
    }
}
