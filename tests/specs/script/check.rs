//! `flare check` specs
//!
//! Check parses and resolves defaults but never runs anything.

use crate::prelude::*;

#[test]
fn check_prints_resolved_defaults() {
    let temp = Project::empty();
    temp.script("CAPTURE /bin/echo 'HELLO WORLD'\n");

    temp.flare()
        .args(&["check", "job.flare"])
        .passes()
        .stdout_has("preamble:")
        .stdout_has("default  FROM        local")
        .stdout_has("default  OUTPUT      ./out.tar.gz")
        .stdout_has("line 2   CAPTURE     /bin/echo 'HELLO WORLD'");
}

#[test]
fn check_does_not_execute_actions() {
    let temp = Project::empty();
    let marker = temp.path().join("marker");
    temp.script(&format!("CAPTURE /usr/bin/touch '{}'\n", marker.display()));

    temp.flare().args(&["check", "job.flare"]).passes();

    assert!(!marker.exists());
    assert!(!temp.workdir().exists());
}

#[test]
fn check_json_tags_each_command() {
    let temp = Project::empty();
    temp.script("ENV A=1\nCOPY /etc/hosts\n");

    temp.flare()
        .args(&["check", "job.flare", "--format", "json"])
        .passes()
        .stdout_has("\"preambles\"")
        .stdout_has("\"directive\": \"ENV\"")
        .stdout_has("\"directive\": \"COPY\"");
}

#[test]
fn explicit_preamble_replaces_default() {
    let temp = Project::empty();
    temp.script("FROM hosts:'10.0.0.1 10.0.0.2:2222'\n");

    temp.flare()
        .args(&["check", "job.flare"])
        .passes()
        .stdout_has("10.0.0.1:22 10.0.0.2:2222")
        .stdout_lacks("default  FROM");
}
