use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn parse_jsonl(stdout: &[u8]) -> Vec<Value> {
    let s = String::from_utf8_lossy(stdout);
    s.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str::<Value>(l).expect("valid jsonl line"))
        .collect()
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn anchorlink() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("anchorlink"));
    cmd.env_remove("LOG_LEVEL");
    cmd
}

fn of_kind<'a>(items: &'a [Value], kind: &str) -> Vec<&'a Value> {
    items.iter().filter(|v| v["kind"] == kind).collect()
}

fn excerpts<'a>(items: &[&'a Value]) -> Vec<&'a str> {
    items
        .iter()
        .map(|v| v["excerpt"].as_str().expect("excerpt present"))
        .collect()
}

#[test]
fn extract_reports_nested_spans_with_byte_ranges() {
    let text = "《a《b》c》";
    let assert = anchorlink()
        .arg("extract")
        .arg("-")
        .write_stdin(text)
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);

    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["excerpt"], "《a《b》c》");
    assert_eq!(items[0]["range"]["start"], 0);
    assert_eq!(items[0]["range"]["end"], text.len());
    assert_eq!(items[0]["data"]["children"][0], 1);
    assert_eq!(items[1]["excerpt"], "《b》");
    assert_eq!(items[1]["range"]["start"], 4);
    assert_eq!(items[1]["meta"]["parent"], 0);
}

#[test]
fn extract_with_custom_pairs() {
    let assert = anchorlink()
        .args(["extract", "-", "--pair", "<=>", "--pair", "[=]"])
        .write_stdin("x <a [b] c> [d")
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);

    let keywords = of_kind(&items, "keyword");
    assert_eq!(excerpts(&keywords), vec!["<a [b] c>", "[b]"]);

    let diagnostics = of_kind(&items, "diagnostic");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0]["errors"][0]["code"], "UNRESOLVED_DELIMITER");
    assert_eq!(diagnostics[0]["excerpt"], "[");
}

#[test]
fn extract_rejects_malformed_pair() {
    anchorlink()
        .args(["extract", "-", "--pair", "<>"])
        .write_stdin("<a>")
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPEN=CLOSE"));
}

#[test]
fn titles_from_file_carry_versions() {
    let assert = anchorlink()
        .arg("titles")
        .arg(fixture("law.txt"))
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);

    assert_eq!(
        excerpts(&items.iter().collect::<Vec<_>>()),
        vec![
            "《中华人民共和国公司法(2023修正)》",
            "《关于适用〈公司法〉若干问题的规定》",
            "《民法典》"
        ]
    );
    assert_eq!(items[0]["meta"]["anchor_type"], "title");
    assert_eq!(items[0]["meta"]["version"], "2023修正");
    assert!(items[1]["meta"].get("version").is_none());
}

#[test]
fn titles_nested_with_extra_pair() {
    let assert = anchorlink()
        .args(["titles", "--nested", "--pair", "《=》", "--pair", "〈=〉"])
        .arg(fixture("law.txt"))
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);

    assert_eq!(items.len(), 4);
    assert_eq!(items[2]["excerpt"], "〈公司法〉");
    assert_eq!(items[2]["meta"]["parent"], 1);
}

#[test]
fn split_keeps_delimiters() {
    let assert = anchorlink()
        .args(["split", "-"])
        .write_stdin("第一句。第二句？尾巴")
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);

    assert_eq!(
        excerpts(&items.iter().collect::<Vec<_>>()),
        vec!["第一句。", "第二句？", "尾巴"]
    );
    assert_eq!(items[1]["range"]["start"], 12);
}

#[test]
fn flatten_emits_fragments_in_reading_order() {
    let assert = anchorlink()
        .arg("flatten")
        .arg(fixture("inline_paragraph.json"))
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);

    assert_eq!(
        excerpts(&items.iter().collect::<Vec<_>>()),
        vec!["A《B", "C", "D》", "E"]
    );
    let fragments: Vec<_> = items
        .iter()
        .map(|v| v["meta"]["fragment"].as_str().unwrap())
        .collect();
    assert_eq!(fragments, vec!["body", "body", "tail", "tail"]);
    assert_eq!(items[2]["meta"]["tag"], "em");
    assert_eq!(items[2]["meta"]["parent"], 0);
}

#[test]
fn enrich_attaches_crossing_title_to_head_and_tail() {
    let assert = anchorlink()
        .arg("enrich")
        .arg(fixture("inline_paragraph.json"))
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);

    let nodes = of_kind(&items, "text_node");
    assert_eq!(nodes.len(), 4);
    assert_eq!(nodes[0]["data"]["anchors"][0]["value"], "《BCD》");
    assert!(nodes[1].get("data").is_none());
    assert_eq!(nodes[2]["data"]["anchors"][0]["value"], "《BCD》");
    assert!(nodes[3].get("data").is_none());

    let anchors = of_kind(&items, "anchor");
    assert_eq!(excerpts(&anchors), vec!["《BCD》"]);
    assert!(of_kind(&items, "diagnostic").is_empty());
}

#[test]
fn enrich_reports_misses_and_honours_ignore_tags() {
    let assert = anchorlink()
        .args(["enrich", "--ignore-tag", "footnote"])
        .arg(fixture("statute.json"))
        .assert()
        .success()
        .stderr(predicate::str::contains("unable to associate anchor"));
    let items = parse_jsonl(&assert.get_output().stdout);

    let anchors = of_kind(&items, "anchor");
    assert_eq!(
        excerpts(&anchors),
        vec!["《中华人民共和国宪法》", "《公司法(2023修正)》", "《跨越》"]
    );
    assert_eq!(anchors[1]["meta"]["version"], "2023修正");

    let nodes = of_kind(&items, "text_node");
    assert!(nodes.iter().all(|n| n["meta"]["tag"] != "footnote"));

    let diagnostics = of_kind(&items, "diagnostic");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0]["errors"][0]["code"], "ASSOCIATION_MISS");
    assert_eq!(diagnostics[0]["excerpt"], "《跨越》");
}

#[test]
fn quiet_suppresses_miss_warnings() {
    anchorlink()
        .args(["-q", "enrich", "--ignore-tag", "footnote"])
        .arg(fixture("statute.json"))
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn config_file_sets_pairs_and_ignore_tags() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("anchorlink.json");
    write_file(
        &config,
        r#"{ "pairs": [{ "open": "<", "close": ">" }], "ignore_tags": ["note"] }"#,
    );
    let tree = temp.path().join("tree.json");
    write_file(
        &tree,
        r#"{ "tag": "doc", "children": [
            { "tag": "note", "text": "<hidden>" },
            { "tag": "p", "text": "see <shown>" }
        ] }"#,
    );

    let assert = anchorlink()
        .arg("--config")
        .arg(&config)
        .arg("enrich")
        .arg(&tree)
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);

    assert_eq!(excerpts(&of_kind(&items, "anchor")), vec!["<shown>"]);
    assert_eq!(of_kind(&items, "text_node").len(), 1);
}

#[test]
fn invalid_config_fails() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("bad.json");
    write_file(&config, r#"{ "pairs": [] }"#);

    anchorlink()
        .arg("--config")
        .arg(&config)
        .args(["titles", "-"])
        .write_stdin("《a》")
        .assert()
        .failure()
        .stderr(predicate::str::contains("delimiter pairs must not be empty"));
}

#[test]
fn missing_input_fails() {
    anchorlink()
        .args(["titles", "/nonexistent/input.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read input"));
}

#[test]
fn invalid_tree_json_fails() {
    anchorlink()
        .args(["flatten", "-"])
        .write_stdin("not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse element tree"));
}

#[test]
fn unknown_format_fails() {
    anchorlink()
        .args(["--format", "xml", "split", "-"])
        .write_stdin("a")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown format"));
}

#[test]
fn json_format_is_single_array() {
    let assert = anchorlink()
        .args(["--format", "json", "titles", "-"])
        .write_stdin("《甲》《乙》")
        .assert()
        .success();

    let value: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(value.as_array().map(|a| a.len()), Some(2));
}

#[test]
fn markdown_groups_by_kind() {
    anchorlink()
        .args(["--format", "md", "enrich"])
        .arg(fixture("inline_paragraph.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("## Text Nodes"))
        .stdout(predicate::str::contains("## Anchors"))
        .stdout(predicate::str::contains("anchor `《BCD》`"));
}

#[test]
fn max_bytes_truncates_excerpts_but_not_ranges() {
    let assert = anchorlink()
        .args(["--max-bytes", "10", "titles", "-"])
        .write_stdin("《中华人民共和国》")
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);

    assert_eq!(items[0]["excerpt"], "《中华");
    assert_eq!(items[0]["meta"]["truncated"], true);
    assert_eq!(items[0]["range"]["end"], 27);
}

#[test]
fn verbose_logs_unresolved_delimiters() {
    anchorlink()
        .args(["-v", "titles", "-"])
        .write_stdin("《未闭合")
        .assert()
        .success()
        .stderr(predicate::str::contains("unresolved"));
}
