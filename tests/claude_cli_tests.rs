//! Claude CLI runtime against a scripted stand-in executable.
#![cfg(unix)]

use std::collections::HashMap;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tern::config::SessionConfig;
use tern::error::{Result, TernError};
use tern::output::DrainSummary;
use tern::runtime::ClaudeCliRuntime;
use tern::turn::TurnRunner;

const PROMPT: &str = "Use codex mcp to write a c++ helloworld";

fn write_script(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("fake-claude");
    std::fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

const TRANSCRIPT: &str = r#"cat <<'JSON'
{"type":"system","subtype":"init","session_id":"s-1"}
{"type":"assistant","message":{"model":"claude","content":[{"type":"text","text":"I'll ask Codex."},{"type":"tool_use","id":"t1","name":"mcp__codex__codex","input":{}}]}}
{"type":"user","message":{"content":[{"type":"tool_result","tool_use_id":"t1","content":"ok"}]}}
{"type":"assistant","message":{"model":"claude","content":[{"type":"text","text":"Done: hello.cpp"}]}}

{"type":"result","subtype":"success","is_error":false,"num_turns":2,"duration_ms":10,"session_id":"s-1","total_cost_usd":0.01234}
JSON
"#;

async fn run(script: &Path, config: &SessionConfig) -> (Result<DrainSummary>, String) {
    let runtime = ClaudeCliRuntime::new().with_executable(script.display().to_string());
    let env: HashMap<String, String> = HashMap::new();
    let mut out = Vec::new();
    let result = TurnRunner::new(&env)
        .stream(&runtime, config, PROMPT, &mut out)
        .await;
    (result, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn transcript_is_rendered_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), TRANSCRIPT);

    let (result, out) = run(&script, &tern::demos::codex_mcp_session()).await;
    let summary = result.unwrap();
    assert_eq!(summary.text_blocks, 2);
    assert_eq!(
        out,
        "Claude: I'll ask Codex.\nClaude: Done: hello.cpp\n\nCost: $0.0123\n"
    );
    assert_eq!(summary.result.unwrap().num_turns, 2);
}

#[tokio::test]
async fn prompt_and_flags_reach_the_process() {
    let dir = tempfile::tempdir().unwrap();
    let args_file = dir.path().join("args.txt");
    let script = write_script(
        dir.path(),
        &format!(
            "for a in \"$@\"; do echo \"$a\" >> '{0}'; done\necho \"$CLAUDE_CODE_ENTRYPOINT\" >> '{0}'\n",
            args_file.display()
        ),
    );

    let (result, out) = run(&script, &tern::demos::codex_mcp_session()).await;
    assert_eq!(result.unwrap().text_blocks, 0);
    assert_eq!(out, "");

    let recorded = std::fs::read_to_string(&args_file).unwrap();
    let lines: Vec<&str> = recorded.lines().collect();
    assert!(lines.contains(&"mcp__codex"));
    assert!(lines.contains(&"--mcp-config"));
    assert_eq!(lines[lines.len() - 2], PROMPT);
    assert_eq!(lines[lines.len() - 1], "sdk-rs");
}

#[tokio::test]
async fn nonzero_exit_after_output_is_a_process_error() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(
        dir.path(),
        r#"echo '{"type":"assistant","message":{"content":[{"type":"text","text":"partial"}]}}'
echo 'Invalid API key' >&2
exit 1
"#,
    );

    let (result, out) = run(&script, &SessionConfig::default()).await;
    assert_eq!(out, "Claude: partial\n");
    let err = result.unwrap_err();
    assert!(!err.is_configuration());
    assert!(matches!(
        err,
        TernError::Process { code: Some(1), ref stderr, .. } if stderr == "Invalid API key"
    ));
}

#[tokio::test]
async fn malformed_output_is_a_protocol_error() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "echo 'not json at all'\n");

    let (result, out) = run(&script, &SessionConfig::default()).await;
    assert_eq!(out, "");
    assert!(matches!(result.unwrap_err(), TernError::Protocol(_)));
}

#[tokio::test]
async fn missing_executable_is_a_collaborator_error() {
    let (result, out) = run(
        Path::new("/nonexistent/claude"),
        &SessionConfig::default(),
    )
    .await;
    assert_eq!(out, "");
    let err = result.unwrap_err();
    assert_eq!(err.exit_code(), 1);
}
