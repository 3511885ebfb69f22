//! Game content definition and the labels that need generated assets.

use crate::error::{AssetError, Result};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// One stage of a level: labels to remember plus decoys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stage {
    pub items: Vec<String>,
    pub distractors: Vec<String>,
}

/// Parsed `game-data.json`, reduced to what asset generation needs.
#[derive(Debug, Clone, Default)]
pub struct GameContent {
    pub levels: BTreeMap<String, Vec<Stage>>,
}

impl GameContent {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| AssetError::ContentUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let json: Value = serde_json::from_str(&raw).map_err(|e| {
            AssetError::MalformedContent(format!("{}: invalid JSON: {}", path.display(), e))
        })?;
        Self::from_value(&json)
    }

    /// Validates the structure eagerly; any missing or mistyped key is an error.
    ///
    /// `stages` may be a list or an object keyed by stage number.
    pub fn from_value(json: &Value) -> Result<Self> {
        let levels = json
            .get("levels")
            .ok_or_else(|| malformed("missing 'levels'"))?
            .as_object()
            .ok_or_else(|| malformed("'levels' must be an object"))?;

        let mut parsed = BTreeMap::new();
        for (level_key, level) in levels {
            let stages = level
                .get("stages")
                .ok_or_else(|| malformed(format!("level '{}': missing 'stages'", level_key)))?;

            let stage_values: Vec<(String, &Value)> = match stages {
                Value::Array(list) => list
                    .iter()
                    .enumerate()
                    .map(|(i, s)| ((i + 1).to_string(), s))
                    .collect(),
                Value::Object(map) => map.iter().map(|(k, s)| (k.clone(), s)).collect(),
                _ => {
                    return Err(malformed(format!(
                        "level '{}': 'stages' must be a list or an object",
                        level_key
                    )))
                }
            };

            let mut level_stages = Vec::with_capacity(stage_values.len());
            for (stage_key, stage) in stage_values {
                let at = format!("level '{}' stage '{}'", level_key, stage_key);
                level_stages.push(Stage {
                    items: string_list(stage, "items", &at)?,
                    distractors: string_list(stage, "distractors", &at)?,
                });
            }
            parsed.insert(level_key.clone(), level_stages);
        }

        Ok(Self { levels: parsed })
    }
}

fn string_list(stage: &Value, key: &str, at: &str) -> Result<Vec<String>> {
    let list = stage
        .get(key)
        .ok_or_else(|| malformed(format!("{}: missing '{}'", at, key)))?
        .as_array()
        .ok_or_else(|| malformed(format!("{}: '{}' must be a list", at, key)))?;

    list.iter()
        .map(|v| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| malformed(format!("{}: '{}' entries must be strings", at, key)))
        })
        .collect()
}

fn malformed(msg: impl Into<String>) -> AssetError {
    AssetError::MalformedContent(msg.into())
}

/// Every distinct item and distractor label, sorted.
pub fn extract_requirements(content: &GameContent) -> Vec<String> {
    let mut labels = BTreeSet::new();
    for stages in content.levels.values() {
        for stage in stages {
            labels.extend(stage.items.iter().cloned());
            labels.extend(stage.distractors.iter().cloned());
        }
    }
    labels.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "levels": {
                "1": {
                    "stages": [
                        { "items": ["تفاحة", "موز"], "distractors": ["تفاحة"] },
                        { "items": ["قطة"], "distractors": ["كلب", "موز"] }
                    ]
                },
                "2": {
                    "stages": { "1": { "items": ["سمكة"], "distractors": [], "questions": [] } }
                }
            },
            "timingConfigurations": {}
        })
    }

    #[test]
    fn test_extract_dedupes_and_sorts() {
        let content = GameContent::from_value(&sample()).unwrap();
        let labels = extract_requirements(&content);
        assert_eq!(labels.len(), 5);
        let mut sorted = labels.clone();
        sorted.sort();
        assert_eq!(labels, sorted);
        assert_eq!(labels.iter().filter(|l| l.as_str() == "تفاحة").count(), 1);
    }

    #[test]
    fn test_duplicate_label_example() {
        let json = json!({
            "levels": { "1": { "stages": [
                { "items": ["تفاحة", "موز", "تفاحة"], "distractors": [] }
            ] } }
        });
        let content = GameContent::from_value(&json).unwrap();
        let labels = extract_requirements(&content);
        assert_eq!(labels, vec!["تفاحة".to_string(), "موز".to_string()]);
    }

    #[test]
    fn test_keyed_stages_accepted() {
        let content = GameContent::from_value(&sample()).unwrap();
        assert_eq!(content.levels["2"].len(), 1);
        assert_eq!(content.levels["2"][0].items, vec!["سمكة".to_string()]);
    }

    #[test]
    fn test_missing_keys_fail_fast() {
        let cases = vec![
            json!({}),
            json!({ "levels": [] }),
            json!({ "levels": { "1": {} } }),
            json!({ "levels": { "1": { "stages": 3 } } }),
            json!({ "levels": { "1": { "stages": [ { "items": [] } ] } } }),
            json!({ "levels": { "1": { "stages": [ { "distractors": [] } ] } } }),
            json!({ "levels": { "1": { "stages": [ { "items": "x", "distractors": [] } ] } } }),
            json!({ "levels": { "1": { "stages": [ { "items": [1], "distractors": [] } ] } } }),
        ];
        for case in cases {
            let err = GameContent::from_value(&case).unwrap_err();
            assert!(
                matches!(err, AssetError::MalformedContent(_)),
                "unexpected error for {}: {:?}",
                case,
                err
            );
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = GameContent::load(&dir.path().join("game-data.json")).unwrap_err();
        assert!(matches!(err, AssetError::ContentUnreadable { .. }));
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game-data.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = GameContent::load(&path).unwrap_err();
        assert!(matches!(err, AssetError::MalformedContent(_)));
    }

    proptest! {
        #[test]
        fn prop_extract_is_union_of_stages(
            stages in proptest::collection::vec(
                (
                    proptest::collection::vec("[a-e]{1,3}", 0..5),
                    proptest::collection::vec("[a-e]{1,3}", 0..5),
                ),
                0..6,
            )
        ) {
            let mut content = GameContent::default();
            let mut expected = BTreeSet::new();
            let stages: Vec<Stage> = stages
                .into_iter()
                .map(|(items, distractors)| {
                    expected.extend(items.iter().cloned());
                    expected.extend(distractors.iter().cloned());
                    Stage { items, distractors }
                })
                .collect();
            content.levels.insert("1".to_string(), stages);

            let labels = extract_requirements(&content);
            let unique: BTreeSet<String> = labels.iter().cloned().collect();
            prop_assert_eq!(unique.len(), labels.len());
            prop_assert_eq!(unique, expected);
        }
    }
}
