use epg_common::observability::LogFormat;
use epg_config::EpgConfigLoader;
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn test_config_load() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r#"
site:
  region_id: 8336
  cookie: "${GUIDE_REGION_COOKIE}"
  detail_concurrency: 2
http:
  timeout_secs: 30
logging:
  format: json
  stderr: true
  filter: "epg_foxtel=debug"
"#;
    let p = write_yaml(&tmp, "epg.yaml", file_yaml);

    temp_env::with_var("GUIDE_REGION_COOKIE", Some("AAMC_foxtel_0=REGION|6"), || {
        let config = EpgConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load grabber config");

        assert_eq!(config.site.cookie, "AAMC_foxtel_0=REGION|6");
        assert_eq!(config.site.detail_concurrency, 2);
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.http.retries, 2);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.logging.stderr);
    });
}

#[test]
#[serial]
fn environment_overrides_file() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "epg.yaml", "site:\n  region_id: 1000\n");

    temp_env::with_vars(
        [
            ("EPG__SITE__REGION_ID", Some("8336")),
            ("EPG__HTTP__RETRIES", Some("5")),
        ],
        || {
            let config = EpgConfigLoader::new().with_file(&p).load().unwrap();
            assert_eq!(config.site.region_id, 8336);
            assert_eq!(config.http.retries, 5);
        },
    );
}

#[test]
#[serial]
fn environment_overrides_optional_file() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(
        &tmp,
        "epg.yaml",
        "site:\n  region_id: 1000\n  detail_concurrency: 2\nlogging:\n  filter: warn\n",
    );

    temp_env::with_vars(
        [
            ("EPG__SITE__DETAIL_CONCURRENCY", Some("8")),
            ("EPG__LOGGING__FILTER", Some("epg_foxtel=trace")),
        ],
        || {
            let config = EpgConfigLoader::new()
                .with_optional_file(&p)
                .load()
                .expect("file plus env");
            assert_eq!(config.site.region_id, 1000);
            assert_eq!(config.site.detail_concurrency, 8);
            assert_eq!(config.logging.filter, "epg_foxtel=trace");
        },
    );
}

#[test]
#[serial]
fn environment_applies_without_a_file() {
    let tmp = TempDir::new().unwrap();
    temp_env::with_var("EPG__HTTP__TIMEOUT_SECS", Some("45"), || {
        let config = EpgConfigLoader::new()
            .with_optional_file(tmp.path().join("absent.yaml"))
            .load()
            .expect("env only");
        assert_eq!(config.http.timeout_secs, 45);
        assert_eq!(config.http.retries, 2);
    });
}

#[test]
#[serial]
fn missing_optional_file_is_fine() {
    let tmp = TempDir::new().unwrap();
    let config = EpgConfigLoader::new()
        .with_optional_file(tmp.path().join("absent.yaml"))
        .load()
        .expect("defaults only");
    assert_eq!(config.site.base_url, "https://www.foxtel.com.au");
}

#[test]
#[serial]
fn missing_required_file_errors() {
    let tmp = TempDir::new().unwrap();
    let err = EpgConfigLoader::new()
        .with_file(tmp.path().join("absent.yaml"))
        .load();
    assert!(err.is_err());
}
