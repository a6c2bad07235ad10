use memgrid_model::{
    FieldProjector, FullRecord, LiteRecord, RecordMeta, SYSTEM_FIELDS, apply_patch, assemble,
};
use memgrid_types::RecordId;
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct MemoryCell {
    #[serde(flatten)]
    meta: RecordMeta,
    user_id: Option<String>,
    timestamp: i64,
    summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    participants: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    episode: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct MemoryCellLite {
    #[serde(flatten)]
    meta: RecordMeta,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    timestamp: Option<i64>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    keywords: Option<Vec<String>>,
}

impl LiteRecord for MemoryCellLite {
    const FIELDS: &'static [&'static str] = &[
        "id",
        "created_at",
        "updated_at",
        "user_id",
        "timestamp",
        "summary",
        "keywords",
    ];

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }
}

impl FullRecord for MemoryCell {
    type Lite = MemoryCellLite;
    const KIND: &'static str = "memory_cell";

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }
}

fn sample_cell() -> MemoryCell {
    MemoryCell {
        meta: RecordMeta::default(),
        user_id: Some("u1".to_string()),
        timestamp: 1_700_000_000_000,
        summary: Some("team discussed the rollout plan".to_string()),
        keywords: Some(vec!["rollout".to_string(), "plan".to_string()]),
        participants: Some(vec!["ada".to_string(), "grace".to_string()]),
        episode: None,
    }
}

#[test]
fn indexed_fields_exclude_system_managed_names() {
    let projector = FieldProjector::<MemoryCell>::new();
    let fields = projector.indexed_fields();
    assert_eq!(fields, &["user_id", "timestamp", "summary", "keywords"]);
    for system in SYSTEM_FIELDS {
        assert!(!fields.contains(&system));
    }
}

#[test]
fn indexed_values_copy_from_full_record() {
    let projector = FieldProjector::<MemoryCell>::new();
    let values = projector.indexed_values(&sample_cell()).unwrap();
    assert_eq!(values.get("user_id"), Some(&json!("u1")));
    assert_eq!(values.get("timestamp"), Some(&json!(1_700_000_000_000i64)));
    assert_eq!(values.get("keywords"), Some(&json!(["rollout", "plan"])));
    // participants is a domain field but not part of the lite schema
    assert!(!values.contains_key("participants"));
}

#[test]
fn project_builds_lite_with_identity() {
    let projector = FieldProjector::<MemoryCell>::new();
    let mut cell = sample_cell();
    let id = RecordId::new();
    cell.meta.id = Some(id);

    let lite = projector.project(&cell).unwrap();
    assert_eq!(lite.meta.id, Some(id));
    assert_eq!(lite.user_id.as_deref(), Some("u1"));
    assert_eq!(lite.summary, cell.summary);
    assert_eq!(lite.timestamp, Some(cell.timestamp));
}

#[test]
fn project_without_identity_leaves_meta_empty() {
    let projector = FieldProjector::<MemoryCell>::new();
    let lite = projector.project(&sample_cell()).unwrap();
    assert_eq!(lite.meta.id, None);
    assert_eq!(lite.meta.created_at, None);
}

#[test]
fn missing_fields_are_skipped_not_errors() {
    // A lite schema may declare fields the full record no longer carries.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct DriftedLite {
        #[serde(flatten)]
        meta: RecordMeta,
        #[serde(default)]
        summary: Option<String>,
        #[serde(default)]
        retired_field: Option<String>,
    }
    impl LiteRecord for DriftedLite {
        const FIELDS: &'static [&'static str] = &["summary", "retired_field"];
        fn meta(&self) -> &RecordMeta {
            &self.meta
        }
    }
    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Drifted {
        #[serde(flatten)]
        meta: RecordMeta,
        summary: Option<String>,
    }
    impl FullRecord for Drifted {
        type Lite = DriftedLite;
        const KIND: &'static str = "drifted";
        fn meta(&self) -> &RecordMeta {
            &self.meta
        }
        fn meta_mut(&mut self) -> &mut RecordMeta {
            &mut self.meta
        }
    }

    let projector = FieldProjector::<Drifted>::new();
    let lite = projector
        .project(&Drifted {
            meta: RecordMeta::default(),
            summary: Some("still here".to_string()),
        })
        .unwrap();
    assert_eq!(lite.summary.as_deref(), Some("still here"));
    assert_eq!(lite.retired_field, None);
}

#[test]
fn assemble_merges_meta_over_fields() {
    let id = RecordId::new();
    let meta = RecordMeta {
        id: Some(id),
        created_at: Some(100),
        updated_at: Some(200),
        deleted_at: None,
        revision: Some(3),
    };
    let mut fields = Map::new();
    fields.insert("user_id".to_string(), json!("u1"));
    fields.insert("summary".to_string(), json!("s"));
    fields.insert("timestamp".to_string(), json!(42));

    let lite: MemoryCellLite = assemble(&meta, &fields).unwrap();
    assert_eq!(lite.meta.id, Some(id));
    assert_eq!(lite.meta.revision, Some(3));
    assert_eq!(lite.user_id.as_deref(), Some("u1"));
    assert_eq!(lite.timestamp, Some(42));
}

#[test]
fn apply_patch_updates_named_fields() {
    let cell = sample_cell();
    let mut patch = Map::new();
    patch.insert("summary".to_string(), json!("revised"));

    let patched = apply_patch(&cell, &patch).unwrap();
    assert_eq!(patched.summary.as_deref(), Some("revised"));
    assert_eq!(patched.user_id, cell.user_id);
}

#[test]
fn apply_patch_ignores_system_fields() {
    let mut cell = sample_cell();
    cell.meta.id = Some(RecordId::new());
    cell.meta.created_at = Some(1);

    let mut patch = Map::new();
    patch.insert("id".to_string(), json!("hijacked"));
    patch.insert("created_at".to_string(), json!(999));
    patch.insert("summary".to_string(), json!("ok"));

    let patched = apply_patch(&cell, &patch).unwrap();
    assert_eq!(patched.meta.id, cell.meta.id);
    assert_eq!(patched.meta.created_at, Some(1));
    assert_eq!(patched.summary.as_deref(), Some("ok"));
}

#[test]
fn apply_patch_drops_unknown_fields() {
    let cell = sample_cell();
    let mut patch = Map::new();
    patch.insert("no_such_field".to_string(), json!("x"));
    let patched = apply_patch(&cell, &patch).unwrap();
    assert_eq!(patched, cell);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Projection copies the exact value of every indexed field the full
        // record carries, and nothing else.
        #[test]
        fn projected_values_match_full_record(
            user_id in "[a-z0-9_]{1,16}",
            summary in ".{0,64}",
            timestamp in 0i64..=4_102_444_800_000,
        ) {
            let cell = MemoryCell {
                meta: RecordMeta::default(),
                user_id: Some(user_id.clone()),
                timestamp,
                summary: Some(summary.clone()),
                keywords: None,
                participants: None,
                episode: None,
            };
            let projector = FieldProjector::<MemoryCell>::new();
            let lite = projector.project(&cell).unwrap();
            prop_assert_eq!(lite.user_id.as_deref(), Some(user_id.as_str()));
            prop_assert_eq!(lite.summary.as_deref(), Some(summary.as_str()));
            prop_assert_eq!(lite.timestamp, Some(timestamp));
            prop_assert_eq!(lite.keywords, None);
        }
    }
}
