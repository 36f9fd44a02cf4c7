use assert_cmd::Command;
use predicates::prelude::*;

fn countdown() -> Command {
    Command::cargo_bin("countdown").unwrap()
}

const NOW: &str = "2026-10-14T12:00:00Z";

#[test]
fn test_units_resolves_and_orders() {
    countdown()
        .args(["units", "s, hours,bogus,d"])
        .assert()
        .success()
        .stdout("days,hours,seconds\n");
}

#[test]
fn test_units_falls_back_to_default() {
    countdown()
        .args(["units", "nothing,valid", "--json"])
        .assert()
        .success()
        .stdout("[\"days\",\"hours\",\"minutes\",\"seconds\"]\n");
}

#[test]
fn test_decompose_clock_output() {
    countdown()
        .args(["decompose", "2026-10-17T16:05:06Z", "--now", NOW])
        .assert()
        .success()
        .stdout("3 Days 04:05:06\n");
}

#[test]
fn test_decompose_json_calendar_units() {
    let output = countdown()
        .args([
            "decompose",
            "2027-12-15T12:00:00Z",
            "--units",
            "y,mo,d",
            "--now",
            NOW,
            "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["years"], 1);
    assert_eq!(json["months"], 2);
    assert_eq!(json["days"], 1);
}

#[test]
fn test_decompose_compact_count_up() {
    countdown()
        .args([
            "decompose",
            "2026-10-13T11:00:00Z",
            "--mode",
            "up",
            "--units",
            "d,h",
            "--now",
            NOW,
            "--compact",
        ])
        .assert()
        .success()
        .stdout("1d 1h\n");
}

#[test]
fn test_decompose_invalid_date_fails() {
    countdown()
        .args(["decompose", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid date"));
}

#[test]
fn test_next_weekly() {
    countdown()
        .args(["next", "2026-10-12T09:00:00Z", "weekly", "--now", NOW])
        .assert()
        .success()
        .stdout("2026-10-19T09:00:00Z\n");
}

#[test]
fn test_next_monthly_clamps() {
    countdown()
        .args(["next", "2026-01-31T00:00:00Z", "monthly", "--now", "2026-02-10T00:00:00Z"])
        .assert()
        .success()
        .stdout("2026-02-28T00:00:00Z\n");
}

#[test]
fn test_next_rejects_unknown_period() {
    countdown()
        .args(["next", "2026-10-12", "fortnightly"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown recurrence"));
}

#[test]
fn test_progress_halfway() {
    countdown()
        .args(["progress", "2026-10-14T11:00:00Z", "2026-10-14T13:00:00Z", "--now", NOW])
        .assert()
        .success()
        .stdout("50.0%\n");
}

#[test]
fn test_to_utc_new_york() {
    countdown()
        .args(["to-utc", "2026-01-27T12:00", "America/New_York"])
        .assert()
        .success()
        .stdout("2026-01-27T17:00:00Z\n");
}

#[test]
fn test_to_utc_fold_later() {
    countdown()
        .args([
            "to-utc",
            "2026-11-01T01:30",
            "America/New_York",
            "--disambiguation",
            "later",
        ])
        .assert()
        .success()
        .stdout("2026-11-01T06:30:00Z\n");
}

#[test]
fn test_to_utc_unknown_zone_fails() {
    countdown()
        .args(["to-utc", "2026-01-27T12:00", "Mars/Olympus_Mons"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timezone"));
}

#[test]
fn test_zones_lists_offsets() {
    countdown()
        .args(["zones", "--at", "2026-01-15T00:00:00Z"])
        .assert()
        .success()
        .stdout(predicate::str::contains("America/New_York"))
        .stdout(predicate::str::contains("GMT-05:00"))
        .stdout(predicate::str::contains("GMT+05:30"));
}

#[test]
fn test_span_human_readable() {
    countdown()
        .args(["span", "2026-03-16T00:00:00Z", "2026-03-18T03:15:00Z"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("2 days, 3 hours, 15 minutes\n"));
}

#[test]
fn test_span_json() {
    let output = countdown()
        .args(["span", "2026-01-01", "2027-01-01", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["days"], 365);
    assert_eq!(json["weeks"], 52);
}

#[test]
fn test_watch_past_date_reaches_and_ends() {
    countdown()
        .args(["watch", "date=2020-01-01", "end=Done", "title=Launch"])
        .assert()
        .success()
        .stdout("Launch: 0s\nLaunch: Done\n");
}

#[test]
fn test_watch_stops_after_ticks() {
    countdown()
        .args(["watch", "date=2099-01-01", "units=y", "--ticks", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Years"));
}

#[test]
fn test_watch_multiple_countdowns() {
    countdown()
        .args(["watch", "date1=2020-01-01", "end1=First", "date2=2021-01-01", "end2=Second"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[1] First"))
        .stdout(predicate::str::contains("[2] Second"));
}

#[test]
fn test_watch_requires_key_value_pairs() {
    countdown()
        .args(["watch", "2026-12-31"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected key=value"));
}

#[test]
fn test_watch_requires_a_date() {
    countdown()
        .args(["watch", "units=d"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no countdown configured"));
}
