//! Error rendering specs
//!
//! Failures print `error: ...` with context and suggestions and exit non-zero.

use crate::prelude::*;

#[test]
fn missing_script_file() {
    Project::empty()
        .flare()
        .args(&["run", "nope.flare"])
        .fails()
        .stderr_has("error: cannot read script nope.flare");
}

#[test]
fn unsupported_directive_names_line_and_alternatives() {
    let temp = Project::empty();
    temp.file("job.flare", "# collect\nSHELL bash\n");

    temp.flare()
        .args(&["check", "job.flare"])
        .fails()
        .stderr_has("job.flare: line 2: SHELL unsupported")
        .stderr_has("suggestions:")
        .stderr_has("CAPTURE");
}

#[test]
fn invalid_directive_arguments_show_usage() {
    let temp = Project::empty();
    temp.file("job.flare", "WORKDIR dir:/tmp\n");

    temp.flare()
        .args(&["run", "job.flare"])
        .fails()
        .stderr_has("line 1: WORKDIR: does not accept parameter 'dir'")
        .stderr_has("usage: WORKDIR path:<path>");
}

#[test]
fn unterminated_quote_is_a_parse_error() {
    let temp = Project::empty();
    temp.file("job.flare", "CAPTURE /bin/echo 'oops\n");

    temp.flare()
        .args(&["check", "job.flare"])
        .fails()
        .stderr_has("line 1: CAPTURE");
}
