use assert_cmd::Command;
use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::thread;
use std::time::Duration;

fn minish() -> Command {
    let mut cmd = Command::cargo_bin("minish").unwrap();
    cmd.env_remove("MINISH_LOG");
    cmd
}

fn run_stdin(dir: &Path, input: &str) -> Output {
    minish()
        .current_dir(dir)
        .write_stdin(input)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn canonical_tempdir() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().canonicalize().unwrap();
    (dir, path)
}

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[test]
fn prompt_goes_to_stderr_for_stdin() {
    let (_tmp, dir) = canonical_tempdir();
    let output = run_stdin(&dir, "\n");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stderr(&output), "shell> shell> ");
    assert_eq!(stdout(&output), "");
}

#[test]
fn quiet_suppresses_prompt() {
    let (_tmp, dir) = canonical_tempdir();
    let output = minish()
        .arg("-q")
        .current_dir(&dir)
        .write_stdin("echo hi\n")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stderr(&output), "");
    assert_eq!(stdout(&output), "hi\n");
}

#[test]
fn script_file_has_no_prompt() {
    let (_tmp, dir) = canonical_tempdir();
    let script = dir.join("commands.txt");
    fs::write(&script, "echo from script\n\n   \necho again\n").unwrap();

    let output = minish().arg(&script).current_dir(&dir).output().unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "from script\nagain\n");
    assert_eq!(stderr(&output), "");
}

#[test]
fn missing_script_exits_1() {
    let (_tmp, dir) = canonical_tempdir();
    let output = minish()
        .arg(dir.join("no-such-script"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("cannot open"));
}

#[test]
fn unreadable_script_exits_2() {
    let (_tmp, dir) = canonical_tempdir();
    let output = minish().arg(&dir).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn unknown_flag_is_usage_error() {
    let output = minish().arg("--no-such-flag").output().unwrap();
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn version_flag() {
    let output = minish().arg("--version").output().unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).starts_with("minish "));
}

#[test]
fn setenv_is_inherited_and_unset() {
    let (_tmp, dir) = canonical_tempdir();
    let output = run_stdin(
        &dir,
        "setenv MINISH_IT_VAR hello extra\nprintenv MINISH_IT_VAR\nsetenv MINISH_IT_VAR\nprintenv MINISH_IT_VAR\n",
    );
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "hello\n");
    assert!(stderr(&output).contains("Command returned 1"));
}

#[test]
fn setenv_without_operand_reports() {
    let (_tmp, dir) = canonical_tempdir();
    let output = run_stdin(&dir, "setenv\necho ok\n");
    assert_eq!(output.status.code(), Some(0));
    assert!(stderr(&output).contains("setenv: missing operand"));
    assert_eq!(stdout(&output), "ok\n");
}

#[test]
fn cd_changes_directory_for_children() {
    let (_tmp, dir) = canonical_tempdir();
    let (_other_tmp, other) = canonical_tempdir();
    let output = run_stdin(&dir, &format!("cd {}\npwd\n", other.display()));
    assert_eq!(stdout(&output), format!("{}\n", other.display()));
}

#[test]
fn cd_failure_keeps_directory() {
    let (_tmp, dir) = canonical_tempdir();
    let output = run_stdin(&dir, "cd /nonexistent/minish/dir\npwd\n");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), format!("{}\n", dir.display()));
    assert!(stderr(&output).contains("cd: /nonexistent/minish/dir"));
}

#[test]
fn cd_without_arguments_uses_home() {
    let (_tmp, dir) = canonical_tempdir();
    let (_home_tmp, home) = canonical_tempdir();
    let output = minish()
        .current_dir(&dir)
        .env("HOME", &home)
        .write_stdin("cd\npwd\n")
        .output()
        .unwrap();
    assert_eq!(stdout(&output), format!("{}\n", home.display()));
}

#[test]
fn cd_without_home_reports() {
    let (_tmp, dir) = canonical_tempdir();
    let output = minish()
        .current_dir(&dir)
        .env_remove("HOME")
        .write_stdin("cd\npwd\n")
        .output()
        .unwrap();
    assert!(stderr(&output).contains("HOME not set"));
    assert_eq!(stdout(&output), format!("{}\n", dir.display()));
}

#[test]
fn output_redirect_captures_and_truncates() {
    let (_tmp, dir) = canonical_tempdir();
    let output = run_stdin(&dir, "echo hello world > out.txt\n");
    assert_eq!(stdout(&output), "");
    assert_eq!(fs::read_to_string(dir.join("out.txt")).unwrap(), "hello world\n");

    let output = run_stdin(&dir, "echo hi >out.txt\n");
    assert_eq!(stdout(&output), "");
    assert_eq!(fs::read_to_string(dir.join("out.txt")).unwrap(), "hi\n");
}

#[test]
fn input_redirect_feeds_stdin() {
    let (_tmp, dir) = canonical_tempdir();
    fs::write(dir.join("in.txt"), "one\ntwo\n").unwrap();
    let output = run_stdin(&dir, "cat < in.txt\n");
    assert_eq!(stdout(&output), "one\ntwo\n");
}

#[test]
fn missing_input_file_reports_status_4() {
    let (_tmp, dir) = canonical_tempdir();
    let output = run_stdin(&dir, "cat < missing.txt\necho next\n");
    assert_eq!(output.status.code(), Some(0));
    assert!(stderr(&output).contains("Command returned 4"));
    assert_eq!(stdout(&output), "next\n");
}

#[test]
fn missing_program_reports_status_6() {
    let (_tmp, dir) = canonical_tempdir();
    let output = run_stdin(&dir, "minish-no-such-program\necho still here\n");
    assert_eq!(output.status.code(), Some(0));
    let err = stderr(&output);
    assert!(err.contains("minish-no-such-program"));
    assert!(err.contains("Command returned 6"));
    assert_eq!(stdout(&output), "still here\n");
}

#[test]
fn nonzero_exit_is_reported() {
    let (_tmp, dir) = canonical_tempdir();
    write_script(&dir, "exit3.sh", "#!/bin/sh\nexit 3\n");
    let output = run_stdin(&dir, "./exit3.sh\ntrue\n");
    assert_eq!(output.status.code(), Some(0));
    let err = stderr(&output);
    assert!(err.contains("Command returned 3\n"));
    assert_eq!(err.matches("Command returned").count(), 1);
}

#[test]
fn signal_death_is_reported() {
    let (_tmp, dir) = canonical_tempdir();
    write_script(&dir, "interrupt.sh", "#!/bin/sh\nkill -INT $$\nsleep 5\n");
    write_script(&dir, "terminate.sh", "#!/bin/sh\nkill -TERM $$\nsleep 5\n");

    let output = run_stdin(&dir, "./interrupt.sh\n./terminate.sh\n");
    assert_eq!(output.status.code(), Some(0));
    let err = stderr(&output);
    assert!(err.contains("Command killed: Interrupt"), "{err}");
    assert!(err.contains("Command killed: Terminated"), "{err}");
}

#[test]
fn exit_stops_immediately() {
    let (_tmp, dir) = canonical_tempdir();
    let output = run_stdin(&dir, "echo before\nexit 5 ignored\necho after\n");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "before\n");
}

#[test]
fn syntax_error_skips_line() {
    let (_tmp, dir) = canonical_tempdir();
    let output = run_stdin(&dir, "echo oops >\necho fine\n");
    assert_eq!(output.status.code(), Some(0));
    assert!(stderr(&output).contains("syntax error"));
    assert_eq!(stdout(&output), "fine\n");
}

#[test]
fn non_utf8_line_runs_and_session_continues() {
    let (_tmp, dir) = canonical_tempdir();
    let script = dir.join("latin1.txt");
    fs::write(&script, b"printf %s caf\xe9 > out.bin\necho after\n").unwrap();

    let output = minish().arg(&script).current_dir(&dir).output().unwrap();
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert_eq!(stdout(&output), "after\n");
    assert_eq!(fs::read(dir.join("out.bin")).unwrap(), b"caf\xe9");
}

#[test]
fn interrupt_during_wait_does_not_stop_the_shell() {
    let (_tmp, dir) = canonical_tempdir();
    let mut child = std::process::Command::new(env!("CARGO_BIN_EXE_minish"))
        .arg("-q")
        .env_remove("MINISH_LOG")
        .current_dir(&dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(b"sleep 2\necho after\n").unwrap();
    drop(stdin);

    // well into the sleep, so the shell is waiting on its child
    thread::sleep(Duration::from_millis(700));
    let pid = libc::pid_t::try_from(child.id()).unwrap();
    // SAFETY: signals the shell process this test started.
    assert_eq!(unsafe { libc::kill(pid, libc::SIGINT) }, 0);

    let output = child.wait_with_output().unwrap();
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert_eq!(stdout(&output), "after\n");
    assert!(!stderr(&output).contains("Command killed"));
}
