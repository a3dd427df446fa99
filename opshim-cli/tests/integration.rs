use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::thread;

use assert_cmd::Command;
use tempfile::NamedTempFile;

fn demo_defs() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../demos/nginx-certificates.yaml")
}

fn write_temp(contents: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().expect("tempfile");
    f.write_all(contents.as_bytes()).expect("write");
    f
}

fn opshim() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("opshim"))
}

/// Serves one canned HTTP response and returns the raw request it received.
fn serve_once(status_line: &str, body: &str) -> (String, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    let response = format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut chunk).expect("read");
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        stream.write_all(response.as_bytes()).expect("write");
        String::from_utf8_lossy(&buf).to_string()
    });
    (format!("http://{addr}"), handle)
}

const CERT_ARGS: [&str; 8] = [
    "--arg",
    "subscription_id=00000000-0000-0000-0000-000000000000",
    "--arg",
    "resource_group=rg1",
    "--arg",
    "deployment_name=dep1",
    "--arg",
    "certificate_name=cert1",
];

#[test]
fn validate_accepts_demo_definitions() {
    opshim()
        .args(["validate", demo_defs().to_string_lossy().as_ref()])
        .assert()
        .success();
}

#[test]
fn validate_rejects_missing_api_version() {
    let doc = r#"
version: "1"
commands:
  - name: thing show
    request:
      method: GET
      path: /things/{name}
      url_params:
        - { name: name, arg: name, required: true }
"#;
    let f = write_temp(doc);
    opshim()
        .args(["validate", f.path().to_string_lossy().as_ref()])
        .assert()
        .code(2);
}

#[test]
fn validate_rejects_unparsable_file() {
    let f = write_temp("   ");
    opshim()
        .args(["validate", f.path().to_string_lossy().as_ref()])
        .assert()
        .code(2);
}

#[test]
fn validate_reports_missing_file() {
    opshim()
        .args(["validate", "/nonexistent/defs.yaml"])
        .assert()
        .code(4);
}

#[test]
fn list_prints_every_command() {
    let out = opshim()
        .args(["list", demo_defs().to_string_lossy().as_ref(), "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let v: serde_json::Value = serde_json::from_slice(&out).expect("json output");
    let names: Vec<&str> = v["commands"]
        .as_array()
        .expect("commands")
        .iter()
        .filter_map(|c| c["name"].as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "nginx deployment certificate create",
            "nginx deployment certificate show",
            "nginx deployment certificate delete",
        ]
    );
    assert_eq!(v["commands"][0]["long_running"], serde_json::json!(true));
}

#[test]
fn show_unknown_command_fails() {
    opshim()
        .args(["show", demo_defs().to_string_lossy().as_ref(), "nginx deployment list"])
        .assert()
        .code(2);
}

#[test]
fn show_prints_definition_as_json() {
    let out = opshim()
        .args([
            "show",
            demo_defs().to_string_lossy().as_ref(),
            "nginx deployment certificate delete",
            "--format",
            "json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).expect("json output");
    assert_eq!(v["request"]["method"], "DELETE");
}

#[test]
fn invoke_with_missing_argument_sends_nothing() {
    // Nothing listens on the discard port; a request would fail with exit 4.
    opshim()
        .args([
            "invoke",
            demo_defs().to_string_lossy().as_ref(),
            "nginx deployment certificate show",
            "--base-url",
            "http://127.0.0.1:9",
            "--arg",
            "subscription_id=sub",
            "--arg",
            "resource_group=rg1",
        ])
        .assert()
        .code(2);
}

#[test]
fn invoke_rejects_no_wait_for_synchronous_command() {
    let mut cmd = opshim();
    cmd.args([
        "invoke",
        demo_defs().to_string_lossy().as_ref(),
        "nginx deployment certificate show",
        "--base-url",
        "http://127.0.0.1:9",
        "--no-wait",
    ]);
    cmd.args(CERT_ARGS).assert().code(2);
}

#[test]
fn invoke_decodes_synchronous_response() {
    let (base_url, server) = serve_once(
        "200 OK",
        r#"{"id":"/c/cert1","name":"cert1","location":"westus","properties":{"certificateVirtualPath":"/etc/nginx/ssl/cert.pem","provisioningState":"Succeeded"},"unknownField":1}"#,
    );

    let mut cmd = opshim();
    cmd.args([
        "invoke",
        demo_defs().to_string_lossy().as_ref(),
        "nginx deployment certificate show",
        "--base-url",
        base_url.as_str(),
        "--format",
        "json",
        "--events",
        "none",
        "--client-flatten",
    ]);
    let out = cmd.args(CERT_ARGS).assert().success().get_output().stdout.clone();

    let v: serde_json::Value = serde_json::from_slice(&out).expect("json output");
    assert_eq!(v["location"], "westus");
    assert_eq!(v["certificateVirtualPath"], "/etc/nginx/ssl/cert.pem");
    assert!(v.get("unknownField").is_none());

    let request = server.join().expect("server thread");
    assert!(request.starts_with(
        "GET /subscriptions/00000000-0000-0000-0000-000000000000/resourceGroups/rg1/providers/Nginx.NginxPlus/nginxDeployments/dep1/certificates/cert1?api-version=2024-06-01-preview "
    ));
}

#[test]
fn invoke_maps_service_error_to_exit_3() {
    let (base_url, server) = serve_once(
        "404 Not Found",
        r#"{"error":{"code":"NotFound","message":"Certificate cert1 was not found."}}"#,
    );

    let mut cmd = opshim();
    cmd.args([
        "invoke",
        demo_defs().to_string_lossy().as_ref(),
        "nginx deployment certificate show",
        "--base-url",
        base_url.as_str(),
        "--events",
        "none",
    ]);
    let assert = cmd.args(CERT_ARGS).assert().code(3);
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("(NotFound) Certificate cert1 was not found."));
    server.join().expect("server thread");
}

#[test]
fn resume_rejects_unreadable_handle() {
    let f = write_temp("not a handle");
    opshim()
        .args([
            "resume",
            demo_defs().to_string_lossy().as_ref(),
            "--handle",
            f.path().to_string_lossy().as_ref(),
        ])
        .assert()
        .code(4);
}
