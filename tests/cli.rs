use std::io::Write;
use std::process::{Command, Output, Stdio};

const PAGE: &str = "<html><head></head><body>\
    <div data-mobile-role=\"footer\">bye</div><div>chrome</div>\
    <div data-mobile-role=\"header\">hi</div></body></html>";

fn mobilizer(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_mobilizer"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn mobilizer");
    // The child may exit before reading (bad config); a broken pipe is fine then.
    let _ = child
        .stdin
        .take()
        .expect("stdin")
        .write_all(stdin.as_bytes());
    child.wait_with_output().expect("wait")
}

#[test]
fn rewrites_stdin_for_all_agents() {
    let out = mobilizer(&["--enable", "--all-agents"], PAGE);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let html = String::from_utf8(out.stdout).expect("utf8");
    assert!(
        html.contains(
            "<body><div data-mobile-role=\"header\">hi</div><div data-mobile-role=\"footer\">bye</div><script"
        ),
        "got: {html}"
    );
    assert!(!html.contains("chrome"));
}

#[test]
fn desktop_requests_are_left_alone() {
    let out = mobilizer(
        &["--enable", "--user-agent", "Mozilla/5.0 (X11; Linux x86_64)"],
        PAGE,
    );
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout), PAGE);
}

#[test]
fn config_file_and_output_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = dir.path().join("mobilize.toml");
    std::fs::write(
        &config,
        "[mobilize]\nenabled = true\nmobilize_all_user_agents = true\nadd_spacer = true\n",
    )
    .expect("write config");
    let input = dir.path().join("page.html");
    std::fs::write(&input, PAGE).expect("write page");
    let output = dir.path().join("out.html");

    let out = mobilizer(
        &[
            "--config",
            config.to_str().expect("utf8 path"),
            "-o",
            output.to_str().expect("utf8 path"),
            input.to_str().expect("utf8 path"),
        ],
        "",
    );
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(out.stdout.is_empty());
    let html = std::fs::read_to_string(&output).expect("read output");
    assert!(html.contains("<body><div class=\"mobilize-spacer\"></div>"), "got: {html}");
}

#[test]
fn outline_mode_prints_tree() {
    let out = mobilizer(&["--enable", "--all-agents", "--outline", "6"], PAGE);
    assert!(out.status.success());
    let outline = String::from_utf8(out.stdout).expect("utf8");
    let lines: Vec<&str> = outline.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "#document");
    assert_eq!(lines[1], "  <html>");
}

#[test]
fn bad_config_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "[mobilize]\nno_such_option = 1\n").expect("write config");
    let out = mobilizer(&["--config", config.to_str().expect("utf8 path")], PAGE);
    assert!(!out.status.success());
    assert!(!String::from_utf8_lossy(&out.stderr).is_empty());
}
