//! Tests for page id parsing, fixture loading and output rendering

use std::path::PathBuf;

use clap::Parser;
use rstest::rstest;

use pagetree::cli::commands::{flagged_messages, render};
use pagetree::cli::{Cli, CliError, Commands, OutputFormat};
use pagetree::config::Settings;
use pagetree::domain::{
    parse_page_id, BlockRecord, BlockValue, DomainError, ExclusionReason, TreeAssembler,
};
use pagetree::exitcode;
use pagetree::infrastructure::di::ServiceContainer;
use pagetree::infrastructure::InfraError;

const ROOT_ID: &str = "4f1c7a2e-8d3b-4c5a-9e6f-0a1b2c3d4e5f";

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/resources/pages/simple.json")
}

fn fixture_container() -> ServiceContainer {
    ServiceContainer::with_fixture(Settings::default(), &fixture_path()).unwrap()
}

#[rstest]
#[case("4f1c7a2e8d3b4c5a9e6f0a1b2c3d4e5f")]
#[case("4F1C7A2E-8D3B-4C5A-9E6F-0A1B2C3D4E5F")]
#[case("https://www.notion.so/Travel-notes-4f1c7a2e8d3b4c5a9e6f0a1b2c3d4e5f")]
#[case("https://www.notion.so/team/Travel-notes-4f1c7a2e8d3b4c5a9e6f0a1b2c3d4e5f?pvs=4#heading")]
fn given_page_reference_when_parsing_then_returns_hyphenated_id(#[case] input: &str) {
    assert_eq!(parse_page_id(input).unwrap(), ROOT_ID);
}

#[rstest]
#[case("")]
#[case("not-a-page")]
#[case("https://www.notion.so/Travel-notes")]
fn given_bad_page_reference_when_parsing_then_fails(#[case] input: &str) {
    assert!(matches!(parse_page_id(input), Err(DomainError::InvalidPageId(_))));
}

#[test]
fn given_fixture_when_downloading_then_builds_tree_without_subpage() {
    // Act
    let assembly = fixture_container()
        .download_service()
        .download(ROOT_ID)
        .unwrap();

    // Assert
    assert_eq!(assembly.root.node_count(), 5);
    assert_eq!(assembly.root.children.len(), 3);
    assert!(assembly.root.find("a0000000-0000-4000-8000-000000000004").is_none());
}

#[test]
fn given_fixture_tree_when_rendering_tree_then_lists_types_and_ids() {
    let assembly = fixture_container()
        .download_service()
        .download(ROOT_ID)
        .unwrap();

    let out = render(&assembly, OutputFormat::Tree).unwrap();

    assert!(out.starts_with(&format!("page ({ROOT_ID})")));
    assert!(out.contains("to_do (b0000000-0000-4000-8000-000000000001)"));
    assert_eq!(out.lines().count(), 5);
}

#[test]
fn given_fixture_tree_when_rendering_json_then_keeps_raw_values() {
    let assembly = fixture_container()
        .download_service()
        .download(ROOT_ID)
        .unwrap();

    let out = render(&assembly, OutputFormat::Json).unwrap();
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();

    assert_eq!(json["type"], "page");
    assert_eq!(json["value"]["version"], 42);
    assert_eq!(json["value"]["properties"]["title"][0][0], "Travel notes");
    assert_eq!(json["children"].as_array().map(Vec::len), Some(3));
}

#[test]
fn given_fixture_tree_when_rendering_nast_then_normalizes_blocks() {
    let assembly = fixture_container()
        .download_service()
        .download(ROOT_ID)
        .unwrap();

    let out = render(&assembly, OutputFormat::Nast).unwrap();
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();

    assert_eq!(json["type"], "page");
    assert_eq!(json["children"][0]["type"], "heading");
    assert_eq!(json["children"][0]["depth"], 1);
    assert_eq!(json["children"][1]["children"][0]["checked"], true);
    assert_eq!(json["children"][2]["source"], "https://maps.example.com/route");
    assert_eq!(json["children"][2]["width"], 9999.0);
}

#[test]
fn given_missing_fixture_when_building_container_then_reports_io_error() {
    let result = ServiceContainer::with_fixture(Settings::default(), &PathBuf::from("/nonexistent/x.json"));

    let err = CliError::from(result.err().unwrap());
    assert!(matches!(err, CliError::Infra(InfraError::Io { .. })));
    assert_eq!(err.exit_code(), exitcode::IOERR);
}

#[test]
fn given_download_args_when_parsing_then_reads_format_and_fixture() {
    let cli = Cli::try_parse_from([
        "pagetree",
        "-dd",
        "download",
        ROOT_ID,
        "--format",
        "nast",
        "--fixture",
        "page.json",
    ])
    .unwrap();

    assert_eq!(cli.debug, 2);
    match cli.command {
        Some(Commands::Download {
            page,
            format,
            fixture,
        }) => {
            assert_eq!(page, ROOT_ID);
            assert_eq!(format, OutputFormat::Nast);
            assert_eq!(fixture, Some(PathBuf::from("page.json")));
        }
        other => panic!("expected download, got {:?}", other),
    }
}

#[test]
fn given_fixture_with_subpage_when_flagging_then_warns_about_skipped_page() {
    let assembly = fixture_container()
        .download_service()
        .download(ROOT_ID)
        .unwrap();

    let messages = flagged_messages(&assembly);

    assert_eq!(
        messages,
        vec![format!(
            "page a0000000-0000-4000-8000-000000000004 under {ROOT_ID} is not part of this document, skipped"
        )]
    );
}

#[test]
fn given_missing_and_shared_children_when_flagging_then_lists_each_condition() {
    // Arrange
    let records = vec![
        BlockRecord::reader(BlockValue::new("root", "page").with_content(["a", "b", "gone"])),
        BlockRecord::reader(BlockValue::new("a", "toggle").with_content(["x"])),
        BlockRecord::reader(BlockValue::new("b", "toggle").with_content(["x"])),
        BlockRecord::reader(BlockValue::new("x", "text")),
    ];
    let assembly = TreeAssembler::new()
        .with_excluded([("gone", ExclusionReason::NoAccess)])
        .assemble(records)
        .unwrap();

    // Act
    let messages = flagged_messages(&assembly);

    // Assert
    assert_eq!(
        messages,
        vec![
            "block x is declared by a and b, shown under b".to_string(),
            "block gone under root is missing or inaccessible, skipped".to_string(),
        ]
    );
}
