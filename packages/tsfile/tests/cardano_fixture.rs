use std::fs;
use std::path::PathBuf;
use tsfile::{
    load_file, load_split, load_train_test, parse_with_options, resample_split, write_ts, Label,
    LabelKind, ParseOptions, Split, TsError,
};

const PROBLEM: &str = "UnequalMinimalCardanoSentiment";

fn data_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data")
}

#[test]
fn test_fixture_loads() {
    let ds = load_split(&data_root(), PROBLEM, Split::Test).unwrap();

    assert_eq!(ds.len(), 20);
    assert_eq!(ds.n_channels(), 2);
    assert_eq!(ds.label_kind(), LabelKind::Numeric);

    let meta = ds.metadata();
    assert_eq!(meta.problem_name.as_deref(), Some(PROBLEM));
    assert_eq!(meta.timestamps, Some(false));
    assert_eq!(meta.univariate, Some(false));
    assert_eq!(meta.equal_length, Some(false));
    assert_eq!(meta.target_label, Some(true));
    assert!(meta.extra.is_empty());

    let first = ds.instance(0).unwrap();
    assert_eq!(first.series_lengths(), vec![22, 24]);
    assert_eq!(first.label(), Some(&Label::Numeric(0.0795)));
    assert_eq!(first.channel(0).unwrap()[0], Some(0.5271));
    assert_eq!(first.channel(1).unwrap()[0], Some(50000.0));

    let last = ds.instance(19).unwrap();
    assert_eq!(last.series_lengths(), vec![24, 22]);
    assert_eq!(last.label(), Some(&Label::Numeric(0.113)));

    assert_eq!(ds.length_range(0), Some((21, 24)));
    assert_eq!(ds.length_range(1), Some((21, 24)));
    assert_eq!(ds.missing_count(), 0);
    assert_eq!(ds.instance(11).unwrap().label(), Some(&Label::Numeric(-0.0967)));
}

#[test]
fn test_fixture_round_trips_through_writer() {
    let ds = load_split(&data_root(), PROBLEM, Split::Test).unwrap();

    let tmp = tempfile::Builder::new().suffix(".ts").tempfile().unwrap();
    write_ts(&ds, fs::File::create(tmp.path()).unwrap()).unwrap();

    let reloaded = load_file(tmp.path()).unwrap();
    assert_eq!(ds, reloaded);
}

#[test]
fn test_fixture_parallel_matches_sequential() {
    let path = tsfile::split_path(&data_root(), PROBLEM, Split::Test);
    let text = fs::read_to_string(path).unwrap();

    let parallel = parse_with_options(
        text.lines(),
        &ParseOptions {
            parallel_threshold: 1,
        },
    )
    .unwrap();
    let sequential = parse_with_options(text.lines(), &ParseOptions::sequential()).unwrap();
    assert_eq!(parallel, sequential);
}

#[test]
fn test_fixture_declared_equal_length_is_rejected() {
    let path = tsfile::split_path(&data_root(), PROBLEM, Split::Test);
    let text = fs::read_to_string(path)
        .unwrap()
        .replace("@equalLength false", "@equalLength true");

    match tsfile::parse_str(&text) {
        Err(TsError::Consistency { line, .. }) => assert_eq!(line, 12),
        other => panic!("expected consistency error, got {:?}", other),
    }
}

#[test]
fn test_fixture_corrupted_token() {
    let path = tsfile::split_path(&data_root(), PROBLEM, Split::Test);
    let text = fs::read_to_string(path)
        .unwrap()
        .replacen("0.93072,0.93311", "0.93072,abc", 1);

    match tsfile::parse_str(&text) {
        Err(TsError::Format { line, field, token }) => {
            assert_eq!(line, 12);
            assert_eq!(field, tsfile::Field::Channel(0));
            assert_eq!(token, "abc");
        }
        other => panic!("expected format error, got {:?}", other),
    }
}

#[test]
fn test_fixture_resample_with_copied_train_split() {
    let dir = tempfile::tempdir().unwrap();
    let problem_dir = dir.path().join(PROBLEM);
    fs::create_dir_all(&problem_dir).unwrap();

    let source = tsfile::split_path(&data_root(), PROBLEM, Split::Test);
    fs::copy(&source, problem_dir.join(format!("{}_TRAIN.ts", PROBLEM))).unwrap();
    fs::copy(&source, problem_dir.join(format!("{}_TEST.ts", PROBLEM))).unwrap();

    let (train, test) = load_train_test(dir.path(), PROBLEM).unwrap();
    let (new_train, new_test) = resample_split(&train, &test, 4, false).unwrap();
    assert_eq!(new_train.len(), 20);
    assert_eq!(new_test.len(), 20);
    assert_eq!(new_train.metadata(), train.metadata());

    let (same_train, same_test) = resample_split(&train, &test, 0, false).unwrap();
    assert_eq!(same_train, train);
    assert_eq!(same_test, test);
}
