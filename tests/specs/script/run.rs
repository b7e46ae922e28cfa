//! `flare run` specs
//!
//! Runs execute on the local node only; RUN and KUBEGET go to a no-op delegate.

use crate::prelude::*;
use std::fs;

#[test]
fn capture_writes_output_under_node_dir() {
    let temp = Project::empty();
    temp.script("CAPTURE /bin/echo 'HELLO WORLD'\n");

    temp.flare()
        .args(&["run", "job.flare"])
        .passes()
        .stdout_has("nodes:     1")
        .stdout_has("captured:  1 file(s)");

    let file = temp.workdir().join("local/bin_echo_HELLO_WORLD.txt");
    assert_eq!(fs::read_to_string(file).unwrap(), "HELLO WORLD\n");
}

#[test]
fn env_pairs_reach_captured_commands() {
    let temp = Project::empty();
    temp.script("ENV FLARE_SPEC='two words'\nCAPTURE /bin/sh -c 'echo $FLARE_SPEC'\n");

    temp.flare().args(&["run", "job.flare"]).passes();

    let file = temp.workdir().join("local/bin_sh_-c_echo_FLARE_SPEC.txt");
    assert_eq!(fs::read_to_string(file).unwrap(), "two words\n");
}

#[test]
fn copy_mirrors_source_tree() {
    let temp = Project::empty();
    temp.file("etc/app/main.conf", "listen = 80\n");
    temp.file("etc/app/conf.d/extra.conf", "");
    temp.script(&format!("COPY '{}'\n", temp.path().join("etc/app").display()));

    temp.flare()
        .args(&["run", "job.flare"])
        .passes()
        .stdout_has("copied:    2 file(s)");

    let source = fs::canonicalize(temp.path().join("etc/app")).unwrap();
    let dest = temp
        .workdir()
        .join("local")
        .join(source.strip_prefix("/").unwrap());
    assert_eq!(
        fs::read_to_string(dest.join("main.conf")).unwrap(),
        "listen = 80\n"
    );
    assert!(dest.join("conf.d/extra.conf").is_file());
}

#[test]
fn copy_sources_with_the_same_name_are_both_kept() {
    let temp = Project::empty();
    temp.file("a/hosts", "from a\n");
    temp.file("b/hosts", "from b\n");
    temp.script(&format!(
        "COPY '{}'\nCOPY '{}'\n",
        temp.path().join("a/hosts").display(),
        temp.path().join("b/hosts").display()
    ));

    temp.flare()
        .args(&["run", "job.flare"])
        .passes()
        .stdout_has("copied:    2 file(s)");

    let node_dir = temp.workdir().join("local");
    for (dir, content) in [("a", "from a\n"), ("b", "from b\n")] {
        let source = fs::canonicalize(temp.path().join(dir).join("hosts")).unwrap();
        let dest = node_dir.join(source.strip_prefix("/").unwrap());
        assert_eq!(fs::read_to_string(dest).unwrap(), content);
    }
}

#[test]
fn captures_with_the_same_flattened_name_are_numbered() {
    let temp = Project::empty();
    temp.script("CAPTURE /bin/echo a b\nCAPTURE /bin/echo a/b\n");

    temp.flare()
        .args(&["run", "job.flare"])
        .passes()
        .stdout_has("captured:  2 file(s)");

    let node_dir = temp.workdir().join("local");
    assert_eq!(
        fs::read_to_string(node_dir.join("bin_echo_a_b.txt")).unwrap(),
        "a b\n"
    );
    assert_eq!(
        fs::read_to_string(node_dir.join("bin_echo_a_b_2.txt")).unwrap(),
        "a/b\n"
    );
}

#[test]
fn copy_of_workdir_is_skipped_not_fatal() {
    let temp = Project::empty();
    temp.script(&format!(
        "COPY '{}'\nCAPTURE /bin/echo still-running\n",
        temp.workdir().display()
    ));

    temp.flare()
        .args(&["run", "job.flare"])
        .passes()
        .stdout_has("skipped:")
        .stdout_has("cannot be relative to workdir")
        .stdout_has("captured:  1 file(s)");
}

#[test]
fn failing_capture_aborts_run() {
    let temp = Project::empty();
    temp.script("CAPTURE /bin/sh -c 'exit 3'\nCAPTURE /bin/echo never\n");

    temp.flare()
        .args(&["run", "job.flare"])
        .fails()
        .stderr_has("line 2: CAPTURE /bin/sh -c 'exit 3'")
        .stderr_has("Try the command on its own");

    assert!(!temp.workdir().join("local/bin_echo_never.txt").exists());
}

#[test]
fn unknown_user_fails_before_creating_workdir() {
    let temp = Project::empty();
    temp.script("AS flare-no-such-user\nCAPTURE /bin/echo hi\n");

    temp.flare()
        .args(&["run", "job.flare"])
        .fails()
        .stderr_has("unknown user: flare-no-such-user");

    assert!(!temp.workdir().exists());
}

#[test]
fn delegated_actions_are_counted() {
    let temp = Project::empty();
    temp.script("RUN uptime\nKUBEGET what:objects kinds:'pods'\n");

    temp.flare()
        .args(&["run", "job.flare"])
        .passes()
        .stdout_has("delegated: 2 action(s)");
}

#[test]
fn json_summary_lists_capture_paths() {
    let temp = Project::empty();
    temp.script("CAPTURE /bin/echo x\n");

    let out = temp
        .flare()
        .args(&["run", "job.flare", "--format", "json"])
        .passes()
        .stdout_has("\"nodes\": 1")
        .stdout();

    assert!(out.contains("bin_echo_x.txt"), "{out}");
}
