//! Help and usage specs

use crate::prelude::*;

#[test]
fn help_lists_subcommands() {
    Project::empty()
        .flare()
        .args(&["--help"])
        .passes()
        .stdout_has("run")
        .stdout_has("check");
}

#[test]
fn run_help_names_script_argument() {
    Project::empty()
        .flare()
        .args(&["run", "--help"])
        .passes()
        .stdout_has("<SCRIPT>")
        .stdout_has("--config");
}

#[test]
fn no_subcommand_is_a_usage_error() {
    Project::empty().flare().fails().stderr_has("Usage");
}

#[test]
fn version_flag_prints_version() {
    Project::empty()
        .flare()
        .args(&["--version"])
        .passes()
        .stdout_has("flare");
}
