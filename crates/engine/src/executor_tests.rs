// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::copy::mirror_path;
use crate::error::CopyError;
use flare_adapters::{
    DelegateCall, FakeDelegate, FakeIdentityResolver, FakeProcessAdapter, LocalProcessAdapter,
    NoOpDelegate, SystemIdentityResolver,
};
use flare_script::{load_script, Defaults};
use std::fs;
use tempfile::{tempdir, TempDir};

type FakeExecutor = Executor<FakeProcessAdapter, FakeDelegate, FakeIdentityResolver>;

struct Harness {
    executor: FakeExecutor,
    process: FakeProcessAdapter,
    delegate: FakeDelegate,
    workdir: PathBuf,
    _dir: TempDir,
}

fn harness() -> Harness {
    let dir = tempdir().unwrap();
    let workdir = dir.path().join("work");
    let process = FakeProcessAdapter::new();
    let delegate = FakeDelegate::new();
    let identity = FakeIdentityResolver::new();
    identity.add_user("alice", 1000, 100);
    identity.add_group("staff", 20);

    Harness {
        executor: Executor::new(ExecutorDeps {
            process: process.clone(),
            delegate: delegate.clone(),
            identity,
        }),
        process,
        delegate,
        workdir,
        _dir: dir,
    }
}

impl Harness {
    /// Where a COPY source lands in a node's directory
    fn mirrored(&self, node: &str, source: &Path) -> PathBuf {
        self.workdir
            .join(node)
            .join(mirror_path(&fs::canonicalize(source).unwrap()))
    }

    fn script(&self, body: &str) -> Script {
        let text = format!("WORKDIR path:'{}'\n{}", self.workdir.display(), body);
        let defaults = Defaults::new(1000, 100, "alice", "/home/alice");
        load_script(text.as_bytes(), &defaults).unwrap()
    }
}

#[tokio::test]
async fn capture_writes_named_file_under_node_dir() {
    let h = harness();
    let script = h.script("CAPTURE /bin/echo 'HELLO WORLD'");

    let summary = h.executor.execute(&script).await.unwrap();

    let expected = h.workdir.join("local").join("bin_echo_HELLO_WORLD.txt");
    assert_eq!(summary.captures, vec![expected.clone()]);
    assert_eq!(fs::read_to_string(&expected).unwrap(), "HELLO WORLD\n");
    assert_eq!(summary.nodes, 1);
}

#[tokio::test]
async fn capture_runs_under_resolved_identity_with_env() {
    let h = harness();
    let script = h.script("AS alice:staff\nENV A=1 B='two words'\nENV A=3\nCAPTURE env");

    h.executor.execute(&script).await.unwrap();

    let calls = h.process.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, "env");
    assert_eq!((calls[0].uid, calls[0].gid), (1000, 20));
    assert_eq!(
        calls[0].env,
        vec![
            ("A".to_string(), "1".to_string()),
            ("B".to_string(), "two words".to_string()),
            ("A".to_string(), "3".to_string()),
        ]
    );
}

#[tokio::test]
async fn two_captures_produce_two_files() {
    let h = harness();
    let script = h.script("CAPTURE /bin/echo 'HELLO WORLD'\nCAPTURE ls .");

    let summary = h.executor.execute(&script).await.unwrap();

    assert_eq!(summary.captures.len(), 2);
    assert_ne!(summary.captures[0], summary.captures[1]);
    for path in &summary.captures {
        assert!(path.exists(), "{}", path.display());
    }
}

#[tokio::test]
async fn captures_that_flatten_alike_get_numbered_files() {
    let h = harness();
    let script = h.script("CAPTURE /bin/echo a b\nCAPTURE /bin/echo a/b\nCAPTURE /bin/echo 'a b'");

    let summary = h.executor.execute(&script).await.unwrap();

    let node_dir = h.workdir.join("local");
    assert_eq!(
        summary.captures,
        vec![
            node_dir.join("bin_echo_a_b.txt"),
            node_dir.join("bin_echo_a_b_2.txt"),
            node_dir.join("bin_echo_a_b_3.txt"),
        ]
    );
    assert_eq!(fs::read_to_string(&summary.captures[0]).unwrap(), "a b\n");
    assert_eq!(fs::read_to_string(&summary.captures[1]).unwrap(), "a/b\n");
}

#[tokio::test]
async fn capture_numbering_restarts_per_node() {
    let h = harness();
    let script = h.script("FROM hosts:'local 10.0.0.2'\nCAPTURE /bin/echo x\nCAPTURE /bin/echo x");

    let summary = h.executor.execute(&script).await.unwrap();

    assert!(summary.captures.contains(&h.workdir.join("local/bin_echo_x_2.txt")));
    assert!(summary
        .captures
        .contains(&h.workdir.join("10.0.0.2_22/bin_echo_x_2.txt")));
    assert!(!summary.captures.iter().any(|p| p.ends_with("bin_echo_x_3.txt")));
}

#[tokio::test]
async fn copy_sources_sharing_a_final_name_are_both_kept() {
    let h = harness();
    let src = tempdir().unwrap();
    let a = src.path().join("a/logs");
    let b = src.path().join("b/logs");
    fs::create_dir_all(&a).unwrap();
    fs::create_dir_all(&b).unwrap();
    fs::write(a.join("app.log"), "from-a").unwrap();
    fs::write(b.join("app.log"), "from-b-longer").unwrap();
    let script = h.script(&format!("COPY '{}' '{}'", a.display(), b.display()));

    let summary = h.executor.execute(&script).await.unwrap();

    assert!(summary.copy_failures.is_empty());
    assert_eq!(summary.copied.len(), 2);
    let from_a = h.mirrored("local", &a).join("app.log");
    let from_b = h.mirrored("local", &b).join("app.log");
    assert_eq!(fs::read_to_string(from_a).unwrap(), "from-a");
    assert_eq!(fs::read_to_string(from_b).unwrap(), "from-b-longer");
}

#[tokio::test]
async fn unknown_identity_fails_without_side_effects() {
    let h = harness();
    let src = tempdir().unwrap();
    fs::write(src.path().join("f.txt"), "x").unwrap();
    let script = h.script(&format!(
        "AS foo:bar\nCAPTURE /bin/echo hi\nCOPY {}",
        src.path().display()
    ));

    let err = h.executor.execute(&script).await.unwrap_err();

    assert!(matches!(err, ExecuteError::Identity(_)), "{err:?}");
    assert!(h.process.calls().is_empty());
    assert!(!h.workdir.exists());
}

#[tokio::test]
async fn unknown_group_fails() {
    let h = harness();
    let script = h.script("AS alice:barr\nCAPTURE ls");
    let err = h.executor.execute(&script).await.unwrap_err();
    assert!(matches!(err, ExecuteError::Identity(_)), "{err:?}");
}

#[tokio::test]
async fn capture_failure_aborts_run() {
    let h = harness();
    h.process.set_failure("false", "nope");
    let script = h.script("CAPTURE false\nCAPTURE /bin/echo after");

    let err = h.executor.execute(&script).await.unwrap_err();

    match &err {
        ExecuteError::Capture { line, command, .. } => {
            assert_eq!(*line, 2);
            assert_eq!(command, "false");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(h.process.calls().len(), 1);
}

#[tokio::test]
async fn copy_of_workdir_is_skipped_and_run_continues() {
    let h = harness();
    let script = h.script(&format!(
        "COPY '{}'\nCAPTURE /bin/echo done",
        h.workdir.display()
    ));

    let summary = h.executor.execute(&script).await.unwrap();

    assert_eq!(summary.copy_failures.len(), 1);
    assert_eq!(summary.copy_failures[0].line, 2);
    assert!(summary.copied.is_empty());
    assert_eq!(summary.captures.len(), 1);
}

#[tokio::test]
async fn copy_reproduces_tree_byte_lengths() {
    let h = harness();
    let src = tempdir().unwrap();
    let tree = src.path().join("etc");
    fs::create_dir_all(tree.join("sub/dir")).unwrap();
    fs::write(tree.join("one.conf"), "1234567").unwrap();
    fs::write(tree.join("sub/two.conf"), "").unwrap();
    fs::write(tree.join("sub/dir/three.conf"), vec![7u8; 4096]).unwrap();
    let script = h.script(&format!("COPY '{}'", tree.display()));

    let summary = h.executor.execute(&script).await.unwrap();

    assert!(summary.copy_failures.is_empty());
    assert_eq!(summary.copied.len(), 3);
    let dest = h.mirrored("local", &tree);
    for rel in ["one.conf", "sub/two.conf", "sub/dir/three.conf"] {
        assert_eq!(
            fs::metadata(dest.join(rel)).unwrap().len(),
            fs::metadata(tree.join(rel)).unwrap().len(),
            "{rel}"
        );
    }
}

#[tokio::test]
async fn copy_failure_is_limited_to_one_path() {
    let h = harness();
    let src = tempdir().unwrap();
    let good = src.path().join("good");
    let bad = src.path().join("bad");
    fs::create_dir_all(&good).unwrap();
    fs::create_dir_all(&bad).unwrap();
    fs::write(good.join("ok.txt"), "fine").unwrap();
    std::os::unix::fs::symlink("/etc/hostname", bad.join("link")).unwrap();
    let script = h.script(&format!(
        "COPY '{}' '{}'",
        bad.display(),
        good.display()
    ));

    let summary = h.executor.execute(&script).await.unwrap();

    assert_eq!(summary.copy_failures.len(), 1);
    assert_eq!(summary.copy_failures[0].path, bad);
    assert_eq!(summary.copied, vec![h.mirrored("local", &good).join("ok.txt")]);
}

#[tokio::test]
async fn actions_run_per_node_in_order() {
    let h = harness();
    let script = h.script(
        "FROM hosts:'local 10.0.0.2:2222'\nCAPTURE /bin/echo x\nRUN uptime\nKUBEGET what:logs",
    );

    let summary = h.executor.execute(&script).await.unwrap();

    assert_eq!(summary.nodes, 2);
    assert_eq!(summary.delegated, 4);
    assert!(h.workdir.join("local/bin_echo_x.txt").exists());
    assert!(h.workdir.join("10.0.0.2_2222/bin_echo_x.txt").exists());

    let calls = h.delegate.calls();
    assert_eq!(calls.len(), 4);
    assert!(matches!(&calls[0], DelegateCall::Run { node, .. } if node.is_local()));
    assert!(matches!(&calls[1], DelegateCall::KubeGet { node, .. } if node.is_local()));
    assert!(
        matches!(&calls[2], DelegateCall::Run { node, output_dir, .. }
            if node.address == "10.0.0.2" && output_dir.ends_with("10.0.0.2_2222"))
    );
}

#[tokio::test]
async fn delegate_failure_is_fatal() {
    let h = harness();
    h.delegate.set_failure("no transport");
    let script = h.script("RUN uptime\nCAPTURE /bin/echo after");

    let err = h.executor.execute(&script).await.unwrap_err();

    assert!(
        matches!(err, ExecuteError::Delegate { directive: Directive::Run, line: 2, .. }),
        "{err:?}"
    );
    assert!(h.process.calls().is_empty());
}

#[tokio::test]
async fn missing_preambles_are_reported() {
    let h = harness();
    let script = flare_script::parse_str("CAPTURE ls").unwrap();
    let err = h.executor.execute(&script).await.unwrap_err();
    assert!(matches!(err, ExecuteError::MissingPreamble(Directive::From)));
}

#[tokio::test]
async fn summary_serializes() {
    let h = harness();
    let script = h.script("CAPTURE /bin/echo x");
    let summary = h.executor.execute(&script).await.unwrap();
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["nodes"], 1);
    assert_eq!(json["captures"].as_array().unwrap().len(), 1);
}

#[test]
fn copy_error_messages_name_the_path() {
    let err = CopyError::SelfReference {
        path: PathBuf::from("/tmp/flare/x"),
        workdir: PathBuf::from("/tmp/flare"),
    };
    assert_eq!(
        err.to_string(),
        "/tmp/flare/x cannot be relative to workdir /tmp/flare"
    );
}

// Real process and identity adapters

#[tokio::test]
async fn local_echo_capture_end_to_end() {
    let dir = tempdir().unwrap();
    let workdir = dir.path().join("work");
    let executor = Executor::new(ExecutorDeps {
        process: LocalProcessAdapter::new(),
        delegate: NoOpDelegate::new(),
        identity: SystemIdentityResolver::new(),
    });
    let defaults = Defaults::new(
        nix::unistd::getuid().as_raw(),
        nix::unistd::getgid().as_raw(),
        "tester",
        dir.path(),
    );
    let text = format!(
        "WORKDIR path:'{}'\nCAPTURE /bin/echo 'HELLO WORLD'",
        workdir.display()
    );
    let script = load_script(text.as_bytes(), &defaults).unwrap();

    let summary = executor.execute(&script).await.unwrap();

    let file = workdir.join("local/bin_echo_HELLO_WORLD.txt");
    assert_eq!(summary.captures, vec![file.clone()]);
    assert_eq!(fs::read_to_string(file).unwrap(), "HELLO WORLD\n");
}

#[tokio::test]
async fn local_missing_program_is_fatal() {
    let dir = tempdir().unwrap();
    let executor = Executor::new(ExecutorDeps {
        process: LocalProcessAdapter::new(),
        delegate: NoOpDelegate::new(),
        identity: SystemIdentityResolver::new(),
    });
    let defaults = Defaults::new(
        nix::unistd::getuid().as_raw(),
        nix::unistd::getgid().as_raw(),
        "tester",
        dir.path(),
    );
    let text = format!(
        "WORKDIR path:'{}'\nCAPTURE /nonexistent/flare-tool --version",
        dir.path().join("work").display()
    );
    let script = load_script(text.as_bytes(), &defaults).unwrap();

    let err = executor.execute(&script).await.unwrap_err();
    assert!(matches!(err, ExecuteError::Capture { .. }), "{err:?}");
}
