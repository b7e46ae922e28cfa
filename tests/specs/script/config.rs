//! Defaults file specs

use crate::prelude::*;

#[test]
fn per_user_config_overrides_builtin_defaults() {
    let temp = Project::empty();
    temp.file(".config/flare/config.toml", "output = \"/srv/bundle.tar.gz\"\n");
    temp.file("job.flare", "CAPTURE ls\n");

    temp.flare()
        .args(&["check", "job.flare"])
        .passes()
        .stdout_has("default  OUTPUT      /srv/bundle.tar.gz");
}

#[test]
fn explicit_config_flag_wins() {
    let temp = Project::empty();
    temp.file(".config/flare/config.toml", "output = \"/srv/ignored.tar.gz\"\n");
    temp.file("custom.toml", "workdir = \"/srv/flare\"\n");
    temp.file("job.flare", "CAPTURE ls\n");

    temp.flare()
        .args(&["check", "job.flare", "--config", "custom.toml"])
        .passes()
        .stdout_has("default  WORKDIR     /srv/flare")
        .stdout_lacks("ignored");
}

#[test]
fn unknown_config_key_is_rejected() {
    let temp = Project::empty();
    temp.file("custom.toml", "shell = \"bash\"\n");
    temp.file("job.flare", "CAPTURE ls\n");

    temp.flare()
        .args(&["check", "job.flare", "--config", "custom.toml"])
        .fails()
        .stderr_has("defaults file custom.toml");
}

#[test]
fn missing_explicit_config_is_an_error() {
    let temp = Project::empty();
    temp.file("job.flare", "CAPTURE ls\n");

    temp.flare()
        .args(&["check", "job.flare", "--config", "absent.toml"])
        .fails()
        .stderr_has("absent.toml");
}
