use std::ffi::CString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::Path;

use filetime::FileTime;

use crate::error::FsError;
use crate::id_lookup;
use crate::meta::{EntryKind, FileMeta};
use crate::uri::Scheme;
use crate::{FileSystem, FileWrite};

/// Local filesystem backend over `std::fs`.
///
/// Ownership is reported as names (resolved through the passwd/group
/// database) so snapshots look the same as HDFS snapshots. An id without a
/// database entry falls back to its decimal form.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalFs;

impl LocalFs {
    /// Creates a handle. The type is stateless; handles are free to copy.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn snapshot(path: &Path, metadata: &fs::Metadata) -> FileMeta {
        let kind = if metadata.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        let mtime_ms = metadata.mtime() * 1000 + metadata.mtime_nsec() / 1_000_000;
        let owner = match id_lookup::user_name(metadata.uid()) {
            Ok(Some(name)) => name,
            _ => metadata.uid().to_string(),
        };
        let group = match id_lookup::group_name(metadata.gid()) {
            Ok(Some(name)) => name,
            _ => metadata.gid().to_string(),
        };
        FileMeta::new(
            path,
            kind,
            metadata.len(),
            mtime_ms,
            metadata.mode() & 0o7777,
            owner,
            group,
        )
    }
}

impl FileSystem for LocalFs {
    fn scheme(&self) -> Scheme {
        Scheme::File
    }

    fn stat(&self, path: &Path) -> Result<FileMeta, FsError> {
        let metadata = fs::metadata(path).map_err(|source| FsError::stat(path, source))?;
        Ok(Self::snapshot(path, &metadata))
    }

    fn exists(&self, path: &Path) -> Result<bool, FsError> {
        match fs::metadata(path) {
            Ok(_) => Ok(true),
            Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(FsError::stat(path, source)),
        }
    }

    fn list(&self, dir: &Path) -> Result<Vec<FileMeta>, FsError> {
        let entries = fs::read_dir(dir).map_err(|source| FsError::list(dir, source))?;
        let mut children = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| FsError::list(dir, source))?;
            children.push(self.stat(&entry.path())?);
        }
        Ok(children)
    }

    fn mkdir(&self, path: &Path) -> Result<(), FsError> {
        fs::create_dir_all(path).map_err(|source| FsError::mkdir(path, source))
    }

    fn delete(&self, path: &Path, recursive: bool) -> Result<(), FsError> {
        let metadata = fs::metadata(path).map_err(|source| FsError::delete(path, source))?;
        let result = if metadata.is_dir() {
            if recursive {
                fs::remove_dir_all(path)
            } else {
                fs::remove_dir(path)
            }
        } else {
            fs::remove_file(path)
        };
        result.map_err(|source| FsError::delete(path, source))
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>, FsError> {
        let file = File::open(path).map_err(|source| FsError::open(path, source))?;
        Ok(Box::new(file))
    }

    fn create(&self, path: &Path, overwrite: bool) -> Result<Box<dyn FileWrite + Send>, FsError> {
        let mut options = OpenOptions::new();
        options.write(true);
        if overwrite {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }
        let file = options
            .open(path)
            .map_err(|source| FsError::create(path, source))?;
        Ok(Box::new(LocalWriter { file }))
    }

    fn set_times(&self, path: &Path, mtime_ms: i64) -> Result<(), FsError> {
        let seconds = mtime_ms.div_euclid(1000);
        let nanos = (mtime_ms.rem_euclid(1000) * 1_000_000) as u32;
        let mtime = FileTime::from_unix_time(seconds, nanos);
        filetime::set_file_mtime(path, mtime).map_err(|source| FsError::set_times(path, source))
    }

    fn set_permission(&self, path: &Path, mode: u32) -> Result<(), FsError> {
        fs::set_permissions(path, fs::Permissions::from_mode(mode))
            .map_err(|source| FsError::set_permission(path, source))
    }

    fn set_owner(
        &self,
        path: &Path,
        owner: Option<&str>,
        group: Option<&str>,
    ) -> Result<(), FsError> {
        let uid = match owner {
            Some(name) => id_lookup::uid_for(name)
                .map_err(|source| FsError::set_owner(path, source))?
                .ok_or_else(|| FsError::UnknownUser {
                    name: name.to_string(),
                })?,
            // -1 keeps the current value.
            None => u32::MAX,
        };
        let gid = match group {
            Some(name) => id_lookup::gid_for(name)
                .map_err(|source| FsError::set_owner(path, source))?
                .ok_or_else(|| FsError::UnknownGroup {
                    name: name.to_string(),
                })?,
            None => u32::MAX,
        };
        let c_path = CString::new(path.as_os_str().as_bytes())
            .map_err(|_| FsError::non_utf8(path))?;
        // SAFETY: c_path is a valid NUL-terminated path for the duration of
        // the call.
        let rc = unsafe { libc::chown(c_path.as_ptr(), uid, gid) };
        if rc == 0 {
            Ok(())
        } else {
            Err(FsError::set_owner(path, io::Error::last_os_error()))
        }
    }
}

struct LocalWriter {
    file: File,
}

impl Write for LocalWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl FileWrite for LocalWriter {
    fn commit(mut self: Box<Self>) -> io::Result<()> {
        self.file.flush()
    }
}
