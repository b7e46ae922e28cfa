// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! COPY: mirror a source tree into a node's output directory

use crate::error::CopyError;
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};

/// Copy `source` to `<dest_root>/<canonical source path>`, preserving structure
///
/// `workdir` must already exist. A source equal to or inside it is
/// rejected; a source containing it has the working directory skipped.
/// Returns the regular files written.
pub fn copy_source(
    source: &Path,
    dest_root: &Path,
    workdir: &Path,
) -> Result<Vec<PathBuf>, CopyError> {
    let workdir = fs::canonicalize(workdir).map_err(|e| io_error(workdir, e))?;
    let resolved = fs::canonicalize(source).map_err(|e| io_error(source, e))?;

    if resolved.starts_with(&workdir) {
        return Err(CopyError::SelfReference {
            path: source.to_path_buf(),
            workdir,
        });
    }

    let dest = dest_root.join(mirror_path(&resolved));
    tracing::debug!(source = %resolved.display(), dest = %dest.display(), "copying");

    let mut copied = Vec::new();
    walk(&resolved, &dest, &workdir, &mut copied)?;
    Ok(copied)
}

/// A canonical path with its root removed, so it can live under another directory
pub(crate) fn mirror_path(resolved: &Path) -> PathBuf {
    resolved
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect()
}

fn io_error(path: &Path, source: io::Error) -> CopyError {
    CopyError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn walk(src: &Path, dest: &Path, skip: &Path, copied: &mut Vec<PathBuf>) -> Result<(), CopyError> {
    let meta = fs::symlink_metadata(src).map_err(|e| io_error(src, e))?;
    let file_type = meta.file_type();

    if file_type.is_dir() {
        if src == skip {
            tracing::debug!(path = %src.display(), "skipping working directory");
            return Ok(());
        }
        fs::create_dir_all(dest).map_err(|e| io_error(dest, e))?;
        let mut entries = fs::read_dir(src)
            .and_then(|dir| dir.collect::<Result<Vec<_>, _>>())
            .map_err(|e| io_error(src, e))?;
        entries.sort_by_key(|entry| entry.file_name());
        for entry in entries {
            walk(&entry.path(), &dest.join(entry.file_name()), skip, copied)?;
        }
        Ok(())
    } else if file_type.is_file() {
        let mut reader = File::open(src).map_err(|e| io_error(src, e))?;
        let mut writer = File::create(dest).map_err(|e| io_error(dest, e))?;
        let written = io::copy(&mut reader, &mut writer).map_err(|e| io_error(src, e))?;
        if written != meta.len() {
            return Err(CopyError::SizeMismatch {
                path: src.to_path_buf(),
                expected: meta.len(),
                copied: written,
            });
        }
        copied.push(dest.to_path_buf());
        Ok(())
    } else {
        Err(CopyError::UnsupportedFileType {
            path: src.to_path_buf(),
        })
    }
}

#[cfg(test)]
#[path = "copy_tests.rs"]
mod tests;
