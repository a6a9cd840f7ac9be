use std::fs;
use std::path::Path;

use tempfile::tempdir;

use steplog::{Error, HeaderValue, LogConfig, LogDirectory, TabularLog, DEFAULT_KEY_COLUMN};

fn write_log(path: &Path, header: &[(&str, &str)], columns: &[&str], rows: &[&[f64]]) {
    let names: Vec<String> = header.iter().map(|(n, _)| format!("{n:>20}")).collect();
    let values: Vec<String> = header.iter().map(|(_, v)| format!("{v:>20}")).collect();
    let numbers: Vec<String> = (1..=columns.len()).map(|i| format!("{i:>20}")).collect();
    let bulk: Vec<String> = columns.iter().map(|c| format!("{c:>20}")).collect();

    let mut text = String::new();
    text.push_str(&(1..=header.len()).map(|i| format!("{i:>20}")).collect::<String>());
    text.push('\n');
    text.push_str(&names.concat());
    text.push('\n');
    text.push_str(&values.concat());
    text.push_str("\n\n");
    text.push_str(&numbers.concat());
    text.push('\n');
    text.push_str(&bulk.concat());
    text.push('\n');
    for row in rows {
        let line: String = row.iter().map(|v| format!("{v:>20}")).collect();
        text.push_str(&line);
        text.push('\n');
    }
    fs::write(path, text).expect("write log");
}

fn write_run(dir: &Path) {
    // The run reached model 5, then restarted from the checkpoint at model 3.
    write_log(
        &dir.join("history.data"),
        &[("version_number", "15140"), ("burn_min1", "50.0")],
        &["model_number", "star_age", "log_Teff"],
        &[
            &[1.0, 0.1, 3.70],
            &[2.0, 0.2, 3.71],
            &[3.0, 0.3, 3.72],
            &[4.0, 0.4, 3.90],
            &[5.0, 0.5, 3.95],
            &[4.0, 0.41, 3.73],
            &[5.0, 0.51, 3.74],
            &[6.0, 0.61, 3.75],
        ],
    );
    fs::write(
        dir.join("profiles.index"),
        "           3 models.    lines hold model number, priority, and profile number.\n\
         1  2  1\n\
         5  1  2\n\
         6  2  3\n",
    )
    .expect("write index");
    write_log(
        &dir.join("profile1.data"),
        &[("model_number", "1"), ("star_age", "0.1")],
        &["zone", "logT"],
        &[&[1.0, 7.0], &[2.0, 6.0]],
    );
    write_log(
        &dir.join("profile3.data"),
        &[("model_number", "6"), ("star_age", "0.61")],
        &["zone", "logT"],
        &[&[1.0, 7.3], &[2.0, 6.3], &[3.0, 5.3]],
    );
}

#[test]
fn history_is_pruned_after_restart() {
    let dir = tempdir().expect("tempdir");
    write_run(dir.path());

    let history =
        TabularLog::open(dir.path().join("history.data"), DEFAULT_KEY_COLUMN).expect("history");
    assert_eq!(
        history.column("model_number"),
        Some(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0][..])
    );
    assert_eq!(history.value_at_key("log_Teff", 4.0).expect("teff"), 3.73);
    assert_eq!(history.pruned_rows(), 2);
    assert_eq!(
        history.header_value("version_number"),
        Some(&HeaderValue::Integer(15140))
    );
    assert_eq!(
        history.header_value("burn_min1"),
        Some(&HeaderValue::Float(50.0))
    );
}

#[test]
fn directory_resolves_snapshots() {
    let dir = tempdir().expect("tempdir");
    write_run(dir.path());

    let logs = LogDirectory::open(LogConfig::new(dir.path())).expect("open logs");
    assert_eq!(logs.index().sequence_ids(), [1u64, 5, 6]);
    assert_eq!(logs.index().snapshot_ids(), [1u64, 2, 3]);

    let latest = logs.resolve_snapshot(None, None).expect("latest");
    assert_eq!(latest.row_count(), 3);
    assert_eq!(
        latest.header_value("model_number"),
        Some(&HeaderValue::Integer(6))
    );

    let first = logs.resolve_snapshot(Some(1), None).expect("first");
    assert_eq!(first.column("logT"), Some(&[7.0, 6.0][..]));

    let by_number = logs.resolve_snapshot(None, Some(1)).expect("by number");
    assert_eq!(by_number, first);

    // Model 5 is indexed but profile2.data was never written.
    assert!(matches!(
        logs.resolve_snapshot(Some(5), None).unwrap_err(),
        Error::MissingSnapshotFile(name) if name == "profile2.data"
    ));
    assert!(matches!(
        logs.resolve_snapshot(Some(4), None).unwrap_err(),
        Error::NoSnapshotForSequence(4)
    ));
}

#[test]
fn directory_selects_models_with_profiles() {
    let dir = tempdir().expect("tempdir");
    write_run(dir.path());

    let logs = LogDirectory::open(LogConfig::new(dir.path())).expect("open logs");
    let young = |v: &[f64]| v[0] < 0.55;
    let ids = logs
        .select_sequence_ids(&["star_age"], Some(&young))
        .expect("select");
    assert_eq!(ids, vec![1, 5]);
}

#[test]
fn custom_names_are_honoured() {
    let dir = tempdir().expect("tempdir");
    write_run(dir.path());
    fs::rename(dir.path().join("history.data"), dir.path().join("run.log")).expect("rename");
    fs::rename(dir.path().join("profile3.data"), dir.path().join("snap3.txt")).expect("rename");

    let err = LogDirectory::open(LogConfig::new(dir.path())).unwrap_err();
    assert!(matches!(err, Error::MissingHistoryFile(_)));

    let config = LogConfig::new(dir.path())
        .with_history_file("run.log")
        .with_snapshot_prefix("snap")
        .with_snapshot_suffix("txt");
    let logs = LogDirectory::open(config).expect("open logs");
    assert!(logs.has_snapshot_file(3));
    assert_eq!(logs.resolve_snapshot(Some(6), None).expect("snap").row_count(), 3);
}

#[test]
fn missing_directory_is_io_error() {
    let dir = tempdir().expect("tempdir");
    let err = LogDirectory::open(LogConfig::new(dir.path().join("absent"))).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
