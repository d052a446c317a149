//! Tests for block-type transformers

use rstest::rstest;
use serde_json::json;

use pagetree::domain::transform::EmbedData;
use pagetree::domain::{assemble, transform, transform_tree, BlockRecord, BlockValue, NastKind};

#[test]
fn given_embed_without_format_when_transforming_then_uses_defaults() {
    // Arrange
    let value = BlockValue::new("e", "embed");

    // Act
    let nast = transform(&value, vec![]);

    // Assert
    let NastKind::Embed(data) = &nast.kind else {
        panic!("expected embed, got {:?}", nast.kind);
    };
    assert_eq!(data.width, 9999.0);
    assert_eq!(data.source, "#");
    assert!(!data.full_width);
    assert!(!data.page_width);
    assert_eq!(data.aspect_ratio, 0.562);
    assert!(data.preserve_scale);
}

#[test]
fn given_embed_defaults_when_serializing_then_uses_camel_case_keys() {
    let nast = transform(&BlockValue::new("e", "video"), vec![]);

    let out = serde_json::to_value(&nast).unwrap();

    assert_eq!(out["type"], "video");
    assert_eq!(out["width"], 9999.0);
    assert_eq!(out["source"], "#");
    assert_eq!(out["fullWidth"], false);
    assert_eq!(out["pageWidth"], false);
    assert_eq!(out["aspectRatio"], 0.562);
    assert_eq!(out["preserveScale"], true);
}

#[test]
fn given_partial_embed_format_when_transforming_then_defaults_each_field_alone() {
    // Arrange
    let value = BlockValue::new("e", "embed").with_format(json!({
        "block_width": 640,
        "display_source": "https://example.com/frame",
        "block_preserve_scale": false,
    }));

    // Act
    let data = EmbedData::from_value(&value);

    // Assert
    assert_eq!(data.width, 640.0);
    assert_eq!(data.source, "https://example.com/frame");
    assert!(!data.preserve_scale);
    assert_eq!(data.aspect_ratio, 0.562);
}

#[rstest]
#[case("header", 1)]
#[case("sub_header", 2)]
#[case("sub_sub_header", 3)]
fn given_heading_block_when_transforming_then_sets_depth(#[case] block_type: &str, #[case] expected: u8) {
    let value = BlockValue::new("h", block_type).with_properties(json!({"title": [["Title"]]}));

    let nast = transform(&value, vec![]);

    match nast.kind {
        NastKind::Heading { depth, text } => {
            assert_eq!(depth, expected);
            assert_eq!(text.plain(), "Title");
        }
        other => panic!("expected heading, got {:?}", other),
    }
}

#[rstest]
#[case(json!({"title": [["buy milk"]], "checked": [["Yes"]]}), true)]
#[case(json!({"title": [["buy milk"]], "checked": [["No"]]}), false)]
#[case(json!({"title": [["buy milk"]]}), false)]
fn given_to_do_block_when_transforming_then_reads_checked(
    #[case] properties: serde_json::Value,
    #[case] expected: bool,
) {
    let value = BlockValue::new("t", "to_do").with_properties(properties);

    let nast = transform(&value, vec![]);

    assert!(matches!(nast.kind, NastKind::ToDo { checked, .. } if checked == expected));
}

#[test]
fn given_common_fields_when_transforming_then_copies_them() {
    // Arrange
    let mut value = BlockValue::new("q", "quote")
        .with_properties(json!({"title": [["Said ", [["i"]]], ["someone"]]}))
        .with_format(json!({"block_color": "gray_background"}));
    value.created_time = Some(1_500_000_000_000);
    value.last_edited_time = Some(1_600_000_000_000);

    // Act
    let nast = transform(&value, vec![]);

    // Assert
    assert_eq!(nast.id, "q");
    assert_eq!(nast.color.as_deref(), Some("gray_background"));
    assert_eq!(nast.created_time, Some(1_500_000_000_000));
    assert_eq!(nast.last_edited_time, Some(1_600_000_000_000));
    assert_eq!(nast.kind.tag(), "quote");
}

#[rstest]
#[case("text", "text")]
#[case("bulleted_list", "bulleted_list_item")]
#[case("numbered_list", "numbered_list_item")]
#[case("toggle", "toggle")]
#[case("callout", "callout")]
#[case("divider", "divider")]
#[case("code", "code")]
#[case("page", "page")]
#[case("collection_view", "unsupported")]
fn given_block_type_when_transforming_then_maps_to_tag(#[case] block_type: &str, #[case] tag: &str) {
    let nast = transform(&BlockValue::new("x", block_type), vec![]);

    assert_eq!(nast.kind.tag(), tag);
}

#[test]
fn given_code_and_callout_when_transforming_then_reads_extra_fields() {
    let code = BlockValue::new("c", "code")
        .with_properties(json!({"title": [["fn main() {}"]], "language": [["Rust"]]}));
    let callout = BlockValue::new("k", "callout").with_format(json!({"page_icon": "💡"}));

    assert_eq!(
        transform(&code, vec![]).kind,
        NastKind::Code {
            text: pagetree::domain::transform::RichText::from_property(Some(&json!([["fn main() {}"]]))),
            language: Some("Rust".to_string()),
        }
    );
    assert!(matches!(
        transform(&callout, vec![]).kind,
        NastKind::Callout { icon: Some(ref icon), .. } if icon == "💡"
    ));
}

#[test]
fn given_assembled_tree_when_transforming_then_mirrors_its_shape() {
    // Arrange
    let root = assemble(vec![
        BlockRecord::reader(
            BlockValue::new("root", "page")
                .with_properties(json!({"title": [["Home"]]}))
                .with_content(["list"]),
        ),
        BlockRecord::reader(BlockValue::new("list", "toggle").with_content(["item", "frame"])),
        BlockRecord::reader(BlockValue::new("item", "bulleted_list")),
        BlockRecord::reader(BlockValue::new("frame", "embed")),
    ])
    .unwrap();

    // Act
    let nast = transform_tree(&root);

    // Assert
    assert_eq!(nast.kind.tag(), "page");
    assert_eq!(nast.children.len(), 1);
    let toggle = &nast.children[0];
    assert_eq!(toggle.kind.tag(), "toggle");
    let tags: Vec<&str> = toggle.children.iter().map(|c| c.kind.tag()).collect();
    assert_eq!(tags, vec!["bulleted_list_item", "embed"]);
}
