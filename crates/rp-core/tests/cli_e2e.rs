//! End-to-end CLI tests for rp-core.
//!
//! Each test runs in its own temp directory with config discovery pinned to
//! that directory, so the host's RP_* variables and XDG config never leak in.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Get a Command for the rp-core binary, isolated in `dir`.
fn rp_core(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rp-core").expect("rp-core binary should exist");
    cmd.current_dir(dir)
        .env_remove("RP_CONFIG")
        .env_remove("RP_CONFIG_DIR")
        .env_remove("RP_LOG")
        .env_remove("RP_LOG_FORMAT")
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", dir.join("xdg"));
    cmd
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../test/fixtures/config")
        .join(name)
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

/// Generate the compact preset into `dir/data.csv`.
fn generate_compact(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("data.csv");
    rp_core(dir.path())
        .args(["generate", "--preset", "compact", "--out"])
        .arg(&path)
        .assert()
        .success();
    path
}

// ============================================================================
// generate
// ============================================================================

mod generate {
    use super::*;

    #[test]
    fn writes_dataset_and_manifest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out/data.csv");
        let output = rp_core(dir.path())
            .args(["generate", "--preset", "compact", "--out"])
            .arg(&path)
            .output()
            .unwrap();
        assert!(output.status.success());

        let json = stdout_json(&output);
        assert_eq!(json["command"], "generate");
        assert_eq!(json["rows"], 48);
        assert_eq!(json["groups"], 4);
        assert_eq!(json["tagged"], true);
        assert_eq!(json["config"]["source"], "preset");

        assert!(path.exists());
        assert!(dir.path().join("out/data.csv.manifest.json").exists());
        let header = std::fs::read_to_string(&path).unwrap();
        assert!(header.starts_with(
            "date,region,plan,revenue_usd_mn,subscribers_mn,growth_rate_pct,marketing_spend_usd_mn,adoption_rate,retention_index,content_launch,anomaly_flag"
        ));
    }

    #[test]
    fn default_path_is_under_data() {
        let dir = TempDir::new().unwrap();
        rp_core(dir.path())
            .args(["generate", "--preset", "compact", "--no-tag"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"tagged\": false"));
        assert!(dir.path().join("data/subscription_revenue.csv").exists());
    }

    #[test]
    fn same_seed_same_bytes() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        for path in [&a, &b] {
            rp_core(dir.path())
                .args(["generate", "--preset", "compact", "--seed", "7", "--out"])
                .arg(path)
                .assert()
                .success();
        }
        assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
    }

    #[test]
    fn range_override() {
        let dir = TempDir::new().unwrap();
        let output = rp_core(dir.path())
            .args([
                "generate", "--preset", "compact", "--start", "2023-01", "--end", "2023-03",
                "--out", "short.csv",
            ])
            .output()
            .unwrap();
        assert!(output.status.success());
        assert_eq!(stdout_json(&output)["rows"], 12);
    }

    #[test]
    fn bad_month_is_args_error() {
        let dir = TempDir::new().unwrap();
        rp_core(dir.path())
            .args(["generate", "--start", "2023-13"])
            .assert()
            .code(10);
    }

    #[test]
    fn contamination_out_of_range_is_args_error() {
        let dir = TempDir::new().unwrap();
        rp_core(dir.path())
            .args(["generate", "--preset", "compact", "--contamination", "0.9"])
            .assert()
            .code(10)
            .stderr(predicate::str::contains("contamination"));
    }

    #[test]
    fn invalid_config_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        rp_core(dir.path())
            .args(["generate", "--config"])
            .arg(fixture("invalid_contamination.json"))
            .assert()
            .code(11);
    }

    #[test]
    fn config_file_from_env() {
        let dir = TempDir::new().unwrap();
        let output = rp_core(dir.path())
            .env("RP_CONFIG", fixture("valid_compact.json"))
            .args(["generate", "--out", "env.csv"])
            .output()
            .unwrap();
        assert!(output.status.success());
        let json = stdout_json(&output);
        assert_eq!(json["config"]["source"], "environment variable");
        assert_eq!(json["seed"], 7);
    }
}

// ============================================================================
// tag
// ============================================================================

mod tag {
    use super::*;

    #[test]
    fn rescore_filtered_subset() {
        let dir = TempDir::new().unwrap();
        let data = generate_compact(&dir);
        let output = rp_core(dir.path())
            .args(["tag", "--region", "A", "--input"])
            .arg(&data)
            .output()
            .unwrap();
        assert!(output.status.success());

        let json = stdout_json(&output);
        assert_eq!(json["rows_loaded"], 48);
        assert_eq!(json["rows_scored"], 24);
        for row in json["anomalies"].as_array().unwrap() {
            assert_eq!(row["region"], "A");
        }
    }

    #[test]
    fn fail_on_anomaly_exits_one() {
        let dir = TempDir::new().unwrap();
        let data = generate_compact(&dir);
        rp_core(dir.path())
            .args(["tag", "--fail-on-anomaly", "--input"])
            .arg(&data)
            .assert()
            .code(1);
    }

    #[test]
    fn writes_tagged_subset() {
        let dir = TempDir::new().unwrap();
        let data = generate_compact(&dir);
        let out = dir.path().join("premium.csv");
        rp_core(dir.path())
            .args(["tag", "--plan", "Premium", "--feature", "revenue", "--feature", "subscribers"])
            .arg("--input")
            .arg(&data)
            .arg("--out")
            .arg(&out)
            .assert()
            .success();

        let rows = rp_core::load_dataset(&out).unwrap();
        assert_eq!(rows.len(), 24);
        assert!(rows.iter().all(|r| r.plan == "Premium" && r.anomaly_flag.is_some()));
    }

    #[test]
    fn empty_selection_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let data = generate_compact(&dir);
        let output = rp_core(dir.path())
            .args(["tag", "--region", "Mars", "--input"])
            .arg(&data)
            .output()
            .unwrap();
        assert!(output.status.success());
        let json = stdout_json(&output);
        assert_eq!(json["rows_scored"], 0);
        assert_eq!(json["flagged"], 0);
    }
}

// ============================================================================
// summary
// ============================================================================

mod summary {
    use super::*;

    #[test]
    fn missing_dataset_exits_twelve() {
        let dir = TempDir::new().unwrap();
        rp_core(dir.path())
            .arg("summary")
            .assert()
            .code(12)
            .stderr(predicate::str::contains(
                "dataset not found at data/subscription_revenue.csv; run `rp-core generate` first",
            ));
    }

    #[test]
    fn totals_match_rows() {
        let dir = TempDir::new().unwrap();
        let data = generate_compact(&dir);
        let rows = rp_core::load_dataset(&data).unwrap();
        let expected = rows.iter().map(|r| r.revenue_usd_mn).sum::<f64>() / 1e3;

        let output = rp_core(dir.path())
            .args(["summary", "--input"])
            .arg(&data)
            .output()
            .unwrap();
        assert!(output.status.success());
        let json = stdout_json(&output);
        assert_eq!(json["summary"]["row_count"], 48);
        let total = json["summary"]["total_revenue_bn"].as_f64().unwrap();
        assert!((total - expected).abs() < 1e-9);
        assert_eq!(json["summary"]["regions"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn retag_filtered() {
        let dir = TempDir::new().unwrap();
        let data = generate_compact(&dir);
        let output = rp_core(dir.path())
            .args(["summary", "--retag", "--region", "B", "--content-launch", "none", "--input"])
            .arg(&data)
            .output()
            .unwrap();
        assert!(output.status.success());
        let json = stdout_json(&output);
        assert_eq!(json["retagged"], true);
        // Region B, 10 of 12 months without a launch, two plans.
        assert_eq!(json["summary"]["row_count"], 20);
    }

    #[test]
    fn filtered_summary_rescores_subset() {
        let dir = TempDir::new().unwrap();
        let data = generate_compact(&dir);

        let tag = rp_core(dir.path())
            .args(["tag", "--region", "A", "--input"])
            .arg(&data)
            .output()
            .unwrap();
        assert!(tag.status.success());
        let tag_flagged = stdout_json(&tag)["flagged"].clone();

        let output = rp_core(dir.path())
            .args(["summary", "--region", "A", "--input"])
            .arg(&data)
            .output()
            .unwrap();
        assert!(output.status.success());
        let json = stdout_json(&output);
        assert_eq!(json["retagged"], true);
        assert_eq!(json["summary"]["row_count"], 24);
        assert_eq!(json["summary"]["anomaly_count"], tag_flagged);
    }

    #[test]
    fn stored_flags_opt_out() {
        let dir = TempDir::new().unwrap();
        let data = generate_compact(&dir);
        let stored = rp_core::load_dataset(&data)
            .unwrap()
            .iter()
            .filter(|r| r.region == "A" && r.anomaly_flag == Some(true))
            .count();

        let output = rp_core(dir.path())
            .args(["summary", "--stored-flags", "--region", "A", "--input"])
            .arg(&data)
            .output()
            .unwrap();
        assert!(output.status.success());
        let json = stdout_json(&output);
        assert_eq!(json["retagged"], false);
        assert_eq!(json["summary"]["anomaly_count"], stored);
    }

    #[test]
    fn unfiltered_summary_uses_stored_flags() {
        let dir = TempDir::new().unwrap();
        let data = generate_compact(&dir);
        let output = rp_core(dir.path())
            .args(["summary", "--input"])
            .arg(&data)
            .output()
            .unwrap();
        assert_eq!(stdout_json(&output)["retagged"], false);
    }

    #[test]
    fn retag_conflicts_with_stored_flags() {
        let dir = TempDir::new().unwrap();
        rp_core(dir.path())
            .args(["summary", "--retag", "--stored-flags"])
            .assert()
            .code(10);
    }

    #[test]
    fn markdown_format() {
        let dir = TempDir::new().unwrap();
        let data = generate_compact(&dir);
        rp_core(dir.path())
            .args(["--format", "md", "summary", "--input"])
            .arg(&data)
            .assert()
            .success()
            .stdout(predicate::str::contains("# Revenue Summary"))
            .stdout(predicate::str::contains("Total Revenue (Bn USD)"));
    }

    #[test]
    fn jsonl_logs_on_stderr() {
        let dir = TempDir::new().unwrap();
        let data = generate_compact(&dir);
        rp_core(dir.path())
            .args(["--log-format", "jsonl", "summary", "--input"])
            .arg(&data)
            .assert()
            .success()
            .stderr(predicate::str::contains("\"event\":\"dataset.loaded\""));
    }
}

// ============================================================================
// check / config / misc
// ============================================================================

mod check {
    use super::*;

    #[test]
    fn fresh_dataset_passes() {
        let dir = TempDir::new().unwrap();
        let data = generate_compact(&dir);
        rp_core(dir.path())
            .args(["check", "--preset", "compact", "--dataset"])
            .arg(&data)
            .assert()
            .success()
            .stdout(predicate::str::contains("\"status\": \"ok\""));
    }

    #[test]
    fn tampered_dataset_fails() {
        let dir = TempDir::new().unwrap();
        let data = generate_compact(&dir);
        let mut content = std::fs::read_to_string(&data).unwrap();
        content = content.replacen("2022-01-01,A,Basic,", "2022-01-01,A,Basic,9", 1);
        std::fs::write(&data, content).unwrap();

        rp_core(dir.path())
            .args(["check", "--preset", "compact", "--dataset"])
            .arg(&data)
            .assert()
            .code(13);
    }

    #[test]
    fn dropped_group_fails() {
        let dir = TempDir::new().unwrap();
        let config = rp_config::get_preset(rp_config::PresetName::Compact);
        let mut rows = rp_core::Synthesizer::new(config.simulation.clone())
            .unwrap()
            .generate();
        rows.retain(|r| !(r.region == "B" && r.plan == "Premium"));
        let data = dir.path().join("dropped.csv");
        let inputs = rp_core::ManifestInputs {
            seed: Some(config.simulation.seed),
            config_hash: Some(config.content_hash()),
        };
        rp_core::write_dataset(&data, &rows, &inputs).unwrap();

        rp_core(dir.path())
            .args(["check", "--preset", "compact", "--dataset"])
            .arg(&data)
            .assert()
            .code(13)
            .stdout(predicate::str::contains("missing_group"));
    }

    #[test]
    fn tagged_subset_passes() {
        let dir = TempDir::new().unwrap();
        let data = generate_compact(&dir);
        let subset = dir.path().join("region_a.csv");
        rp_core(dir.path())
            .args(["tag", "--preset", "compact", "--region", "A", "--input"])
            .arg(&data)
            .arg("--out")
            .arg(&subset)
            .assert()
            .success();

        rp_core(dir.path())
            .args(["check", "--preset", "compact", "--dataset"])
            .arg(&subset)
            .assert()
            .success();
    }

    #[test]
    fn missing_dataset_exits_twelve() {
        let dir = TempDir::new().unwrap();
        rp_core(dir.path())
            .args(["check", "--dataset", "nope.csv"])
            .assert()
            .code(12);
    }

    #[test]
    fn invalid_config_exits_eleven() {
        let dir = TempDir::new().unwrap();
        rp_core(dir.path())
            .args(["check", "--config"])
            .arg(fixture("invalid_range.json"))
            .assert()
            .code(11);
    }
}

mod misc {
    use super::*;

    #[test]
    fn config_presets_lists_all() {
        let dir = TempDir::new().unwrap();
        rp_core(dir.path())
            .args(["config", "presets"])
            .assert()
            .success()
            .stdout(predicate::str::contains("baseline"))
            .stdout(predicate::str::contains("volatile"))
            .stdout(predicate::str::contains("compact"));
    }

    #[test]
    fn config_show_defaults_to_baseline() {
        let dir = TempDir::new().unwrap();
        let output = rp_core(dir.path()).args(["config", "show"]).output().unwrap();
        assert!(output.status.success());
        let json = stdout_json(&output);
        assert_eq!(json["snapshot"]["source"], "builtin default");
        assert_eq!(json["config"]["simulation"]["regions"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn config_schema_is_json() {
        let dir = TempDir::new().unwrap();
        let output = rp_core(dir.path()).args(["config", "schema"]).output().unwrap();
        assert!(output.status.success());
        let json = stdout_json(&output);
        assert!(json["properties"]["simulation"].is_object());
    }

    #[test]
    fn completions_bash() {
        let dir = TempDir::new().unwrap();
        rp_core(dir.path())
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("rp-core"));
    }

    #[test]
    fn version_json() {
        let dir = TempDir::new().unwrap();
        rp_core(dir.path())
            .arg("version")
            .assert()
            .success()
            .stdout(predicate::str::contains("rp_core_version"));
    }

    #[test]
    fn unknown_command_is_args_error() {
        let dir = TempDir::new().unwrap();
        rp_core(dir.path())
            .arg("nonexistent-command")
            .assert()
            .code(10)
            .stderr(predicate::str::contains("error"));
    }

    #[test]
    fn help_exits_clean() {
        let dir = TempDir::new().unwrap();
        rp_core(dir.path())
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("generate"));
    }
}
