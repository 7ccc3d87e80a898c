//! Integration tests for account and session commands via CLI.
//!
//! These tests verify that:
//! - `folio register/login/logout/whoami` work end to end
//! - users.json is written in the name/password object layout
//! - errors are reported on stderr with a stable code and exit status 1

mod common;

use common::TestEnv;
use predicates::prelude::*;

// === Register Tests ===

#[test]
fn test_register_writes_users_file() {
    let env = TestEnv::new();

    env.folio()
        .args(["register", "alice", "Alice Smith", "--password", "secret1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"registered\":true"))
        .stdout(predicate::str::contains("\"username\":\"alice\""));

    let contents = std::fs::read_to_string(env.data_path().join("users.json")).unwrap();
    let users: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(users["alice"]["name"], "Alice Smith");
    assert_eq!(users["alice"]["password"], "secret1");
}

#[test]
fn test_register_human_readable() {
    let env = TestEnv::new();

    env.folio()
        .args(["register", "alice", "Alice Smith", "--password", "secret1", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered alice (Alice Smith)"));
}

#[test]
fn test_register_trims_username_and_name() {
    let env = TestEnv::new();

    env.folio()
        .args(["register", "  alice  ", "  Alice Smith ", "--password", "secret1"])
        .assert()
        .success();

    let contents = std::fs::read_to_string(env.data_path().join("users.json")).unwrap();
    let users: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(users["alice"]["name"], "Alice Smith");
}

#[test]
fn test_register_duplicate_username() {
    let env = TestEnv::new();

    env.folio()
        .args(["register", "alice", "Alice Smith", "--password", "secret1"])
        .assert()
        .success();

    env.folio()
        .args(["register", "alice", "Someone Else", "--password", "other12"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("\"code\":\"username_taken\""));

    // The original record is untouched.
    let contents = std::fs::read_to_string(env.data_path().join("users.json")).unwrap();
    let users: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(users["alice"]["name"], "Alice Smith");
}

#[test]
fn test_register_validation_messages() {
    let env = TestEnv::new();

    env.folio()
        .args(["register", "al", "Alice Smith", "--password", "secret1", "-H"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Username must be at least 3 characters long",
        ));

    env.folio()
        .args(["register", "alice", "Alice Smith", "--password", "123", "-H"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Password must be at least 6 characters long",
        ));

    env.folio()
        .args(["register", "   ", "Alice Smith", "--password", "secret1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"code\":\"validation\""));

    env.folio()
        .args(["register", "alice", "A", "--password", "secret1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"code\":\"validation\""));

    assert!(!env.data_path().join("users.json").exists());
}

// === Login Tests ===

#[test]
fn test_login_success() {
    let env = TestEnv::new();
    env.folio()
        .args(["register", "alice", "Alice Smith", "--password", "secret1"])
        .assert()
        .success();

    env.folio()
        .args(["login", "alice", "--password", "secret1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"authenticated\":true"))
        .stdout(predicate::str::contains("\"name\":\"Alice Smith\""))
        .stdout(predicate::str::contains("\"page\":\"main\""));
}

#[test]
fn test_login_human_readable() {
    let env = TestEnv::logged_in();

    env.folio()
        .args(["login", "alice", "--password", "secret1", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome, Alice Smith!"));
}

#[test]
fn test_login_failures_share_one_message() {
    let env = TestEnv::new();
    env.folio()
        .args(["register", "alice", "Alice Smith", "--password", "secret1"])
        .assert()
        .success();

    let wrong_password = env
        .folio()
        .args(["login", "alice", "--password", "wrongpw", "-H"])
        .output()
        .unwrap();
    let unknown_user = env
        .folio()
        .args(["login", "nobody", "--password", "secret1", "-H"])
        .output()
        .unwrap();

    assert_eq!(wrong_password.status.code(), Some(1));
    assert_eq!(unknown_user.status.code(), Some(1));
    assert_eq!(wrong_password.stderr, unknown_user.stderr);
    assert!(String::from_utf8_lossy(&wrong_password.stderr)
        .contains("Invalid username or password"));
}

#[test]
fn test_login_error_json_shape() {
    let env = TestEnv::new();

    let output = env
        .folio()
        .args(["login", "nobody", "--password", "secret1"])
        .output()
        .unwrap();
    let err: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(err["code"], "invalid_credentials");
    assert_eq!(err["error"], "Invalid username or password");
}

// === Session Tests ===

#[test]
fn test_whoami_and_logout() {
    let env = TestEnv::logged_in();

    env.folio()
        .args(["whoami", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as alice (Alice Smith)"));

    env.folio()
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"logged_out\":true"));

    env.folio()
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"authenticated\":false"))
        .stdout(predicate::str::contains("username").not());

    env.folio()
        .args(["logout", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in."));
}

#[test]
fn test_session_file_written() {
    let env = TestEnv::logged_in();

    let contents = std::fs::read_to_string(env.data_path().join("session.json")).unwrap();
    let session: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(session["authenticated"], true);
    assert_eq!(session["username"], "alice");
}

#[test]
fn test_malformed_users_file_is_reported() {
    let env = TestEnv::new();
    std::fs::write(env.data_path().join("users.json"), "[1, 2, 3]").unwrap();

    env.folio()
        .args(["login", "alice", "--password", "secret1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"code\":\"storage\""));
}

// === Config Tests ===

#[test]
fn test_data_dir_flag_overrides_env() {
    let env = TestEnv::new();
    let other = common::TempDir::new().unwrap();

    env.folio()
        .args(["register", "alice", "Alice Smith", "--password", "secret1"])
        .arg("--data-dir")
        .arg(other.path())
        .assert()
        .success();

    assert!(other.path().join("users.json").exists());
    assert!(!env.data_path().join("users.json").exists());
}

#[test]
fn test_config_show_sources() {
    let env = TestEnv::new();
    let config = env.config_file();
    std::fs::create_dir_all(config.parent().unwrap()).unwrap();
    std::fs::write(&config, "currency \"GBP\"\nlogin-attempt-limit 5\n").unwrap();

    env.folio()
        .args(["config", "show", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("data-dir ="))
        .stdout(predicate::str::contains("[env:FOLIO_DATA_DIR]"))
        .stdout(predicate::str::contains("currency = GBP [config:"))
        .stdout(predicate::str::contains("date-format = %d-%m-%Y [default]"))
        .stdout(predicate::str::contains(
            "login-attempt-limit = 5 [config:",
        ))
        .stdout(predicate::str::contains("(not enforced)"));
}

#[test]
fn test_invalid_config_file_is_reported() {
    let env = TestEnv::new();
    let config = env.config_file();
    std::fs::create_dir_all(config.parent().unwrap()).unwrap();
    std::fs::write(&config, "items-per-page 0\n").unwrap();

    env.folio()
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"code\":\"config\""));
}
