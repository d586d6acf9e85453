use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use photo_board::ordering::OrderMode;
use photo_board::pipeline::Pipeline;
use photo_board::scan::{DEFAULT_EXTENSIONS, ExtensionMatcher};
use photo_board::zone::Zone;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const ZONE: Zone = Zone::Named(chrono_tz::Europe::Amsterdam);

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<FixedOffset> {
    ZONE.ymd_hms(
        NaiveDate::from_ymd_opt(y, m, d).unwrap(),
        NaiveTime::from_hms_opt(h, min, s).unwrap(),
    )
    .unwrap()
}

fn pipeline(root: &Path, mode: OrderMode, seed: Option<u64>) -> Pipeline {
    Pipeline::new(
        root.to_path_buf(),
        ExtensionMatcher::new(&DEFAULT_EXTENSIONS).unwrap(),
        ZONE,
        mode,
        seed,
    )
}

fn touch(root: &Path, names: &[&str]) {
    for name in names {
        let path = root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"x").unwrap();
    }
}

#[test]
fn scenario_two_dated_files_and_one_undated() {
    let tmp = tempdir().unwrap();
    touch(tmp.path(), &["2024-01-01 a.jpg", "2024-01-02 b.png", "zzz.jpg"]);
    let mut p = pipeline(tmp.path(), OrderMode::Sorted, None);

    // Mid-morning on the 2nd: the cutoff is the 2nd's midnight.
    let report = p.run_at(at(2024, 1, 2, 10, 0, 0)).unwrap();
    let visible: Vec<_> = report.state.relative_paths().collect();
    assert_eq!(visible, vec!["2024-01-02 b.png"]);
    assert_eq!(report.unparsed.len(), 1);
    assert_eq!(report.unparsed[0].relative_path, "zzz.jpg");

    // Exactly at midnight of the 2nd nothing has elapsed; same cutoff.
    let report = p.run_at(at(2024, 1, 2, 0, 0, 0)).unwrap();
    assert_eq!(
        report.state.relative_paths().collect::<Vec<_>>(),
        vec!["2024-01-02 b.png"]
    );

    // On the 1st both are today-or-later.
    let report = p.run_at(at(2024, 1, 1, 10, 0, 0)).unwrap();
    assert_eq!(
        report.state.relative_paths().collect::<Vec<_>>(),
        vec!["2024-01-01 a.jpg", "2024-01-02 b.png"]
    );
}

#[test]
fn today_is_visible_at_any_time_of_day() {
    let tmp = tempdir().unwrap();
    touch(tmp.path(), &["2024-05-10 today.jpg", "2024-05-09 yesterday.jpg"]);
    let mut p = pipeline(tmp.path(), OrderMode::Sorted, None);

    for (h, m, s) in [(0, 0, 0), (0, 0, 1), (12, 0, 0), (23, 59, 59)] {
        let report = p.run_at(at(2024, 5, 10, h, m, s)).unwrap();
        let visible: Vec<_> = report.state.relative_paths().collect();
        assert_eq!(visible, vec!["2024-05-10 today.jpg"], "at {h:02}:{m:02}:{s:02}");
    }
}

#[test]
fn undated_files_never_break_the_scan() {
    let tmp = tempdir().unwrap();
    touch(
        tmp.path(),
        &[
            "holiday.jpg",
            "2024-13-01 bad-month.jpg",
            "20240101 compact.png",
            "2030-01-01 future.gif",
            "nested/2030-06-01 deep.jpeg",
        ],
    );
    let mut p = pipeline(tmp.path(), OrderMode::Sorted, None);

    let report = p.run_at(at(2024, 1, 1, 9, 0, 0)).unwrap();
    assert_eq!(
        report.state.relative_paths().collect::<Vec<_>>(),
        vec!["2030-01-01 future.gif", "nested/2030-06-01 deep.jpeg"]
    );
    let mut unparsed: Vec<_> = report
        .unparsed
        .iter()
        .map(|u| u.relative_path.as_str())
        .collect();
    unparsed.sort_unstable();
    assert_eq!(
        unparsed,
        vec!["2024-13-01 bad-month.jpg", "20240101 compact.png", "holiday.jpg"]
    );
}

#[test]
fn sorted_mode_is_idempotent() {
    let tmp = tempdir().unwrap();
    touch(
        tmp.path(),
        &["2030-01-03 c.jpg", "2030-01-01 a.jpg", "sub/2030-01-02 b.jpg"],
    );
    let mut p = pipeline(tmp.path(), OrderMode::Sorted, None);
    let now = at(2024, 1, 1, 12, 0, 0);

    let first = p.run_at(now).unwrap().state;
    let second = p.run_at(now).unwrap().state;
    assert_eq!(first.entries, second.entries);
}

#[test]
fn shuffle_mode_yields_permutations_of_the_same_set() {
    let tmp = tempdir().unwrap();
    let names: Vec<String> = (0..20).map(|i| format!("2030-01-{:02} p.jpg", i + 1)).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    touch(tmp.path(), &refs);
    touch(tmp.path(), &["2000-01-01 old.jpg"]);

    let mut p = pipeline(tmp.path(), OrderMode::Shuffle, Some(42));
    let now = at(2024, 1, 1, 12, 0, 0);

    let mut orders = Vec::new();
    for _ in 0..5 {
        let state = p.run_at(now).unwrap().state;
        let order: Vec<String> = state.relative_paths().map(str::to_string).collect();
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(sorted, names, "shuffle must keep exactly the visible set");
        orders.push(order);
    }
    assert!(
        orders.windows(2).any(|w| w[0] != w[1]),
        "successive shuffles should not all repeat the same order"
    );
}

#[test]
fn vanished_directory_is_an_error() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("photos");
    fs::create_dir_all(&root).unwrap();
    let mut p = pipeline(&root, OrderMode::Sorted, None);
    assert!(p.run_at(at(2024, 1, 1, 0, 0, 0)).is_ok());

    fs::remove_dir_all(&root).unwrap();
    assert!(p.run_at(at(2024, 1, 1, 0, 0, 0)).is_err());
}
