//! File-backed pipelines: CSV in, JSON lines out.

use std::fs;
use std::io::Write;

use rowpipe_core::{PipelineConfig, Record, Scalar};
use rowpipe_io::{read_csv, read_lines, write_lines, JsonlWriter};
use rowpipe_operators::JoinKind;
use tempfile::tempdir;

fn write_file(path: &std::path::Path, text: &str) {
    let mut file = fs::File::create(path).expect("Failed to create test file");
    file.write_all(text.as_bytes()).expect("Failed to write test file");
}

#[test]
fn test_csv_join_to_jsonl() {
    let dir = tempdir().expect("tempdir");
    let people = dir.path().join("people.csv");
    let pets = dir.path().join("pets.csv");
    let out = dir.path().join("out.jsonl");
    write_file(&people, "name,age\ncarina,27\ngatsby,7\njohn,31\n");
    write_file(&pets, "name,kind\ngatsby,dog\nmax,fish\n");

    let config = PipelineConfig::default();
    let joined = read_csv(&people, None, &config)
        .expect("open people")
        .join(JoinKind::Outer, "name", read_csv(&pets, None, &config).expect("open pets"))
        .expect("join");
    assert_eq!(joined.len(), 4);

    let mut writer = JsonlWriter::to_path(&out).expect("create sink");
    let written = writer.write_stream(joined.into_stream()).expect("write");
    assert_eq!(written, 4);
    drop(writer);

    let lines: Vec<serde_json::Value> = read_lines(&out)
        .expect("reopen")
        .map(|l| serde_json::from_str(&l).expect("json line"))
        .to_list()
        .expect("lines");
    assert_eq!(lines[1]["name"], "gatsby");
    assert_eq!(lines[1]["kind"], "dog");
    assert_eq!(lines[1]["age"], 7);
    assert_eq!(lines[3]["name"], "max");
    assert!(lines[3].get("age").is_none());
}

#[test]
fn test_csv_batches_with_explicit_headers() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("nums.csv");
    write_file(&path, "1,a\n2,b\n3,c\n");

    let headers = Some(vec!["n".to_string(), "s".to_string()]);
    let batches = read_csv(&path, headers, &PipelineConfig::default())
        .expect("open")
        .batch(2)
        .expect("batch")
        .to_list()
        .expect("batches");
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[1][0].get("n"), Some(&Scalar::I64(3)));
}

#[test]
fn test_lines_round_trip_through_stream() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("words.txt");
    let file = fs::File::create(&path).expect("create");
    let words = rowpipe_operators::Stream::new(vec!["b", "a", "b", "c"]).dedupe(|w| *w);
    assert_eq!(write_lines(file, words).expect("write"), 3);

    let back = read_lines(&path).expect("open").to_list().expect("read");
    assert_eq!(back, vec!["b", "a", "c"]);
}

#[test]
fn test_missing_file_is_an_io_error() {
    let err = read_csv("/no/such/file.csv", None, &PipelineConfig::default()).unwrap_err();
    assert!(matches!(err, rowpipe_io::IoError::Io(_)));
}
