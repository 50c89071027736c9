//! Path-based helpers around the codec.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use heatgrid_kernel::World;

use crate::decode::read_world;
use crate::encode::{Encoding, encode};
use crate::error::CodecError;

/// Load a world file in either encoding.
pub fn load_path(path: impl AsRef<Path>) -> Result<World, CodecError> {
    let path = path.as_ref();
    let world = read_world(BufReader::new(File::open(path)?))?;
    tracing::debug!(
        path = %path.display(),
        width = world.width(),
        height = world.height(),
        "loaded world"
    );
    Ok(world)
}

/// Save a world file.
///
/// The world is written to a sibling `<name>.tmp` file which is renamed over
/// `path` only once the write has fully succeeded, so readers never observe a
/// partial world.
pub fn save_path(
    world: &World,
    encoding: Encoding,
    path: impl AsRef<Path>,
) -> Result<(), CodecError> {
    let path = path.as_ref();
    let tmp = tmp_path(path);

    let result = File::create(&tmp).map_err(CodecError::from).and_then(|file| {
        let mut out = BufWriter::new(file);
        encode(world, encoding, &mut out)?;
        out.into_inner()
            .map_err(|e| CodecError::Io(e.into_error()))?
            .sync_all()?;
        Ok(())
    });
    if let Err(e) = result {
        let _ = std::fs::remove_file(&tmp);
        return Err(e);
    }

    std::fs::rename(&tmp, path)?;
    tracing::debug!(path = %path.display(), ?encoding, "saved world");
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Encode through a buffered writer and flush it, so the final flush error is
/// reported instead of being dropped with the buffer.
pub fn encode_and_flush<W: Write>(
    world: &World,
    encoding: Encoding,
    dst: W,
) -> Result<(), CodecError> {
    let mut out = BufWriter::new(dst);
    encode(world, encoding, &mut out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use heatgrid_kernel::make_test_world;

    #[test]
    fn save_then_load_both_encodings() {
        let tmp = tempfile::tempdir().unwrap();
        let world = make_test_world(12, 0.2).unwrap();

        for (name, encoding) in [("w.txt", Encoding::Text), ("w.bin", Encoding::Binary)] {
            let path = tmp.path().join(name);
            save_path(&world, encoding, &path).unwrap();
            assert!(!tmp.path().join(format!("{name}.tmp")).exists());
            let loaded = load_path(&path).unwrap();
            assert_eq!(loaded, world);
        }
    }

    #[test]
    fn save_overwrites_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("world");
        std::fs::write(&path, b"not a world").unwrap();

        let world = make_test_world(5, 0.1).unwrap();
        save_path(&world, Encoding::Binary, &path).unwrap();
        assert_eq!(load_path(&path).unwrap(), world);
    }

    #[test]
    fn save_into_missing_directory_fails_cleanly() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("no_such_dir").join("world");
        let world = make_test_world(5, 0.1).unwrap();
        assert!(matches!(
            save_path(&world, Encoding::Text, &path),
            Err(CodecError::Io(_))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_path(tmp.path().join("absent")),
            Err(CodecError::Io(_))
        ));
    }

    #[test]
    fn corrupted_file_fails_closed() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("world.txt");
        let world = make_test_world(6, 0.1).unwrap();
        save_path(&world, Encoding::Text, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::write(&path, text.replace("End", "Fin")).unwrap();
        assert!(matches!(
            load_path(&path),
            Err(CodecError::Format(crate::FormatError::MissingTerminator { .. }))
        ));
    }

    #[test]
    fn encode_and_flush_writes_everything() {
        let world = make_test_world(4, 0.1).unwrap();
        let mut buf = Vec::new();
        encode_and_flush(&world, Encoding::Text, &mut buf).unwrap();
        assert_eq!(buf, crate::encode_to_vec(&world, Encoding::Text));
    }
}
