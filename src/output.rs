// src/output.rs
// =============================================================================
// Writes the processed mirror list to disk.
//
// Rules for the output file:
// - it must not exist yet (we never overwrite an existing mirror list)
// - it is created readable and writable by the owner only (0600 on Unix)
// - all lines are written in one buffered batch and flushed before returning
//
// The File lives inside write_mirrorlist(), so it is closed on every path out
// of the function, including the error paths.
// =============================================================================

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::OutputError;
use crate::mirrorlist::MirrorLines;

// Creates `path` and appends every line to it
//
// The lines are written exactly as held in MirrorLines. They were decoded as
// UTF-8 when read, so invalid bytes from the server end up as U+FFFD.
//
// Returns: number of bytes written
pub fn write_mirrorlist(path: &Path, lines: &MirrorLines) -> Result<usize, OutputError> {
    let file = open_new(path).map_err(|source| OutputError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let written = write_lines(BufWriter::new(file), lines).map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!("Wrote {} byte(s) to {}", written, path.display());
    Ok(written)
}

fn write_lines(mut writer: impl Write, lines: &MirrorLines) -> std::io::Result<usize> {
    let mut written = 0;
    for line in lines.lines() {
        writer.write_all(line.as_bytes())?;
        written += line.len();
    }
    writer.flush()?;
    Ok(written)
}

// create_new fails if the file is already there
fn open_new(path: &Path) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.append(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    options.open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mirrorlist::Termination;

    fn sample_lines() -> MirrorLines {
        MirrorLines::new(
            vec![
                "## Germany\n".to_string(),
                "Server = https://a.example/$repo/os/$arch\n".to_string(),
            ],
            Termination::EndOfInput,
        )
    }

    #[test]
    fn test_write_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mirrorlist");

        let written = write_mirrorlist(&path, &sample_lines()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "## Germany\nServer = https://a.example/$repo/os/$arch\n");
        assert_eq!(written, content.len());
    }

    #[test]
    fn test_existing_file_is_not_touched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mirrorlist");
        std::fs::write(&path, "keep me\n").unwrap();

        let result = write_mirrorlist(&path, &sample_lines());

        assert!(matches!(result, Err(OutputError::Open { .. })));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep me\n");
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("mirrorlist");

        let result = write_mirrorlist(&path, &sample_lines());
        assert!(matches!(result, Err(OutputError::Open { .. })));
    }

    #[test]
    fn test_empty_list_creates_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mirrorlist");

        let empty = MirrorLines::new(Vec::new(), Termination::EndOfInput);
        assert_eq!(write_mirrorlist(&path, &empty).unwrap(), 0);
        assert!(path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_owner_only_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mirrorlist");
        write_mirrorlist(&path, &sample_lines()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
