use assert_cmd::Command;

fn cmd() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

#[test]
fn vanilla() {
    cmd()
        .arg("3 * (4 + 2) / 2")
        .assert()
        .success()
        .stdout("3 * (4 + 2) / 2 = 9\n");
}

#[test]
fn power_is_right_associative() {
    cmd().arg("2^3^2").assert().success().stdout("2^3^2 = 512\n");
}

#[test]
fn negative_expression() {
    cmd().arg("-1").assert().success().stdout("-1 = -1\n");
}

#[test]
fn with_history() {
    cmd().args(["2 + 2 * 2", "--history"]).assert().success().stdout(
        "\
2 + 2 * 2 = 6
calculation history:
1. expr: 2 + 2 * 2 = 6
",
    );
}

#[test]
fn json_output() {
    cmd()
        .args(["sqrt(144)", "--out", "json"])
        .assert()
        .success()
        .stdout("{\"operation\":\"evaluated\",\"expr\":\"sqrt(144)\",\"result\":12.0}\n");
}

#[test]
fn stdin_session() {
    cmd()
        .write_stdin("1 + 1\n2^3^2\n")
        .assert()
        .success()
        .stdout("1 + 1 = 2\n2^3^2 = 512\n");
}
