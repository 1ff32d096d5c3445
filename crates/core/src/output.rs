use std::io::{self, ErrorKind};
use std::path::Path;

use tokio::fs;

/// Make sure the output root exists before any job starts writing into it.
///
/// An existing directory is fine; an existing file (or anything else that is
/// not a directory) at that path is an error.
pub async fn prepare_output_root<P: AsRef<Path>>(output_dir: P) -> io::Result<()> {
    let path = output_dir.as_ref();
    match fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(io::Error::new(
            ErrorKind::AlreadyExists,
            format!("output path {} exists but is not a directory", path.display()),
        )),
        Err(e) if e.kind() == ErrorKind::NotFound => fs::create_dir_all(path).await,
        Err(e) => Err(e),
    }
}
