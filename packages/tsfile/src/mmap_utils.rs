use crate::error::{Result, TsError};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

/// Open a file and map it into memory (read-only).
///
/// Empty files yield `None`; there is nothing to map.
pub fn mmap_file(path: &Path) -> Result<Option<Mmap>> {
    let file = File::open(path).map_err(TsError::IoError)?;
    if file.metadata()?.len() == 0 {
        return Ok(None);
    }
    let mmap = unsafe { Mmap::map(&file).map_err(TsError::IoError)? };
    Ok(Some(mmap))
}
