//! Read-only memory mapping of large data files.
//!
//! The usual lifecycle is [`MappedFile::open`] then [`MappedFile::map`], use
//! the bytes through the returned [`MappedRegion`], then release it with
//! [`unmap`] (or by dropping it) and drop the file. The region is never
//! written to, so any number of threads may read it at once.

use std::fs::File;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use memmap2::{Mmap, MmapOptions};
use tracing::{debug, warn};

use crate::error::MapError;

/// An open, read-only handle to a file that can be mapped.
#[derive(Debug)]
pub struct MappedFile {
    file: File,
    path: PathBuf,
}

impl MappedFile {
    /// Open `path` for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| MapError::Open {
            path: path.clone(),
            source,
        })?;
        Ok(Self { file, path })
    }

    /// Size of the file in bytes, queried without mapping it.
    pub fn size(&self) -> Result<u64, MapError> {
        self.file
            .metadata()
            .map(|meta| meta.len())
            .map_err(|source| MapError::Metadata {
                path: self.path.clone(),
                source,
            })
    }

    /// Map the whole file read-only.
    ///
    /// On unix the kernel is told that access will be random, which stops it
    /// from reading ahead through tables probed at scattered offsets.
    pub fn map(&self) -> Result<MappedRegion, MapError> {
        let size = self.size()?;
        if size == 0 {
            return Err(MapError::Empty {
                path: self.path.clone(),
            });
        }

        // SAFETY: the mapping is read-only and this process never writes the
        // file. Other processes truncating it underneath us is not something
        // we can defend against.
        let mmap = unsafe { MmapOptions::new().map(&self.file) }.map_err(|source| {
            MapError::Map {
                path: self.path.clone(),
                source,
            }
        })?;

        #[cfg(unix)]
        {
            if let Err(err) = mmap.advise(memmap2::Advice::Random) {
                // Only a hint; the mapping is still usable.
                warn!(path = %self.path.display(), %err, "madvise(MADV_RANDOM) failed");
            }
        }

        debug!(path = %self.path.display(), bytes = mmap.len(), "mapped file");
        Ok(MappedRegion {
            mmap,
            path: self.path.clone(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A read-only view of a whole file's bytes.
///
/// Dropping the region unmaps it; the bytes must not be used afterwards,
/// which the borrow checker enforces for slices obtained through
/// [`Deref`].
#[derive(Debug)]
pub struct MappedRegion {
    mmap: Mmap,
    path: PathBuf,
}

impl MappedRegion {
    /// Mapped size in bytes, equal to the file size at mapping time.
    #[inline]
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// Start of the mapped bytes.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.mmap.as_ptr()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.mmap
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Deref for MappedRegion {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        &self.mmap
    }
}

/// Release a mapping. `None` (a mapping that never succeeded) is a no-op, so
/// callers can use one release path regardless of how acquisition went.
pub fn unmap(region: Option<MappedRegion>) {
    if let Some(region) = region {
        debug!(path = %region.path.display(), bytes = region.len(), "unmapped file");
        drop(region);
    }
}

/// Open and map `path` in one step, for optional resources.
///
/// Any failure is logged and reported as `None`; the file handle is closed
/// before returning because the mapping stays valid on its own.
pub fn map_file(path: impl AsRef<Path>) -> Option<MappedRegion> {
    let path = path.as_ref();
    match MappedFile::open(path).and_then(|file| file.map()) {
        Ok(region) => Some(region),
        Err(err) => {
            warn!(%err, "data file unavailable");
            None
        }
    }
}
