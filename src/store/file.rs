//! Reading and durably replacing the JSON state file.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use super::StoreError;
use super::state::StoreState;

const INDENT: &[u8] = b"    ";

pub(super) fn read_state(path: &Path) -> Result<StoreState, StoreError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(StoreError::Missing(path.to_path_buf()));
        }
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let state: StoreState =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| StoreError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

    state.validate().map_err(|reason| StoreError::Invalid {
        path: path.to_path_buf(),
        reason,
    })?;

    Ok(state)
}

/// Write to a sibling `<file>.<pid>.tmp`, sync it, then rename over `path`.
pub(super) fn atomic_write(path: &Path, state: &StoreState) -> Result<(), StoreError> {
    let temp_path = temp_path_for(path);

    let result = write_synced(&temp_path, state).and_then(|()| {
        fs::rename(&temp_path, path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_synced(temp_path: &Path, state: &StoreState) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: temp_path.to_path_buf(),
        source,
    };

    let file = File::create(temp_path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);

    let mut serializer =
        serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(INDENT));
    state
        .serialize(&mut serializer)
        .map_err(|source| StoreError::Encode {
            path: temp_path.to_path_buf(),
            source,
        })?;

    writer.flush().map_err(io_err)?;
    writer.get_ref().sync_all().map_err(io_err)?;
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("state"));
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}
