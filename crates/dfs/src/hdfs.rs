use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use hdfs_native::client::FileStatus;
use hdfs_native::file::{FileReader, FileWriter};
use hdfs_native::{Client, HdfsError, WriteOptions};
use tokio::runtime::Runtime;

use crate::error::FsError;
use crate::meta::{EntryKind, FileMeta};
use crate::uri::{Scheme, Uri};
use crate::{FileSystem, FileWrite};

// Directories created on HDFS before any chmod rule runs.
const DEFAULT_DIR_PERMISSION: u32 = 0o755;

/// HDFS backend over the `hdfs-native` protocol client.
///
/// The client is async; this type owns a private current-thread tokio runtime
/// and blocks on every call, so the engine sees the same synchronous surface
/// as [`crate::LocalFs`].
pub struct HdfsFs {
    client: Client,
    runtime: Arc<Runtime>,
}

impl HdfsFs {
    /// Connects to the namenode named by an `hdfs://` URI.
    pub fn connect(uri: &Uri) -> Result<Self, FsError> {
        let authority = uri.authority().unwrap_or_default();
        let endpoint = format!("hdfs://{authority}");
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|source| FsError::Connect {
                endpoint: endpoint.clone(),
                source,
            })?;
        let client = Client::new(&endpoint).map_err(|error| FsError::Connect {
            endpoint,
            source: hdfs_io(error),
        })?;
        Ok(Self {
            client,
            runtime: Arc::new(runtime),
        })
    }

    fn snapshot(status: &FileStatus) -> FileMeta {
        let kind = if status.isdir {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        FileMeta::new(
            Path::new(&status.path),
            kind,
            status.length as u64,
            status.modification_time as i64,
            u32::from(status.permission),
            status.owner.clone(),
            status.group.clone(),
        )
    }
}

fn hdfs_io(error: HdfsError) -> io::Error {
    match &error {
        HdfsError::FileNotFound(_) => io::Error::new(io::ErrorKind::NotFound, error.to_string()),
        _ => io::Error::other(error.to_string()),
    }
}

fn path_str(path: &Path) -> Result<&str, FsError> {
    path.to_str().ok_or_else(|| FsError::non_utf8(path))
}

impl FileSystem for HdfsFs {
    fn scheme(&self) -> Scheme {
        Scheme::Hdfs
    }

    fn stat(&self, path: &Path) -> Result<FileMeta, FsError> {
        let text = path_str(path)?;
        let status = self
            .runtime
            .block_on(self.client.get_file_info(text))
            .map_err(|error| FsError::stat(path, hdfs_io(error)))?;
        Ok(Self::snapshot(&status))
    }

    fn exists(&self, path: &Path) -> Result<bool, FsError> {
        let text = path_str(path)?;
        match self.runtime.block_on(self.client.get_file_info(text)) {
            Ok(_) => Ok(true),
            Err(HdfsError::FileNotFound(_)) => Ok(false),
            Err(error) => Err(FsError::stat(path, hdfs_io(error))),
        }
    }

    fn list(&self, dir: &Path) -> Result<Vec<FileMeta>, FsError> {
        let text = path_str(dir)?;
        let statuses = self
            .runtime
            .block_on(self.client.list_status(text, false))
            .map_err(|error| FsError::list(dir, hdfs_io(error)))?;
        Ok(statuses.iter().map(Self::snapshot).collect())
    }

    fn mkdir(&self, path: &Path) -> Result<(), FsError> {
        let text = path_str(path)?;
        self.runtime
            .block_on(self.client.mkdirs(text, DEFAULT_DIR_PERMISSION, true))
            .map_err(|error| FsError::mkdir(path, hdfs_io(error)))
    }

    fn delete(&self, path: &Path, recursive: bool) -> Result<(), FsError> {
        let text = path_str(path)?;
        let deleted = self
            .runtime
            .block_on(self.client.delete(text, recursive))
            .map_err(|error| FsError::delete(path, hdfs_io(error)))?;
        if deleted {
            Ok(())
        } else {
            Err(FsError::delete(
                path,
                io::Error::new(io::ErrorKind::NotFound, "namenode reported nothing deleted"),
            ))
        }
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>, FsError> {
        let text = path_str(path)?;
        let reader = self
            .runtime
            .block_on(self.client.read(text))
            .map_err(|error| FsError::open(path, hdfs_io(error)))?;
        Ok(Box::new(HdfsReader {
            runtime: Arc::clone(&self.runtime),
            reader,
            position: 0,
        }))
    }

    fn create(&self, path: &Path, overwrite: bool) -> Result<Box<dyn FileWrite + Send>, FsError> {
        let text = path_str(path)?;
        let options = WriteOptions {
            overwrite,
            ..WriteOptions::default()
        };
        let writer = self
            .runtime
            .block_on(self.client.create(text, options))
            .map_err(|error| FsError::create(path, hdfs_io(error)))?;
        Ok(Box::new(HdfsWriter {
            runtime: Arc::clone(&self.runtime),
            writer,
        }))
    }

    fn set_times(&self, path: &Path, mtime_ms: i64) -> Result<(), FsError> {
        let text = path_str(path)?;
        // The protocol wants an access time as well; reuse the current one so
        // only the modification time moves.
        let atime = self
            .runtime
            .block_on(self.client.get_file_info(text))
            .map_err(|error| FsError::set_times(path, hdfs_io(error)))?
            .access_time;
        self.runtime
            .block_on(self.client.set_times(text, mtime_ms as u64, atime))
            .map_err(|error| FsError::set_times(path, hdfs_io(error)))
    }

    fn set_permission(&self, path: &Path, mode: u32) -> Result<(), FsError> {
        let text = path_str(path)?;
        self.runtime
            .block_on(self.client.set_permission(text, mode))
            .map_err(|error| FsError::set_permission(path, hdfs_io(error)))
    }

    fn set_owner(
        &self,
        path: &Path,
        owner: Option<&str>,
        group: Option<&str>,
    ) -> Result<(), FsError> {
        let text = path_str(path)?;
        self.runtime
            .block_on(self.client.set_owner(text, owner, group))
            .map_err(|error| FsError::set_owner(path, hdfs_io(error)))
    }
}

struct HdfsReader {
    runtime: Arc<Runtime>,
    reader: FileReader,
    position: usize,
}

impl Read for HdfsReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.reader.file_length().saturating_sub(self.position);
        let wanted = buf.len().min(remaining);
        if wanted == 0 {
            return Ok(0);
        }
        let chunk = self
            .runtime
            .block_on(self.reader.read_range(self.position, wanted))
            .map_err(hdfs_io)?;
        let copied = chunk.len();
        buf[..copied].copy_from_slice(&chunk);
        self.position += copied;
        Ok(copied)
    }
}

struct HdfsWriter {
    runtime: Arc<Runtime>,
    writer: FileWriter,
}

impl Write for HdfsWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self
            .runtime
            .block_on(self.writer.write(Bytes::copy_from_slice(buf)))
            .map_err(hdfs_io)?;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl FileWrite for HdfsWriter {
    fn commit(mut self: Box<Self>) -> io::Result<()> {
        let runtime = Arc::clone(&self.runtime);
        runtime.block_on(self.writer.close()).map_err(hdfs_io)
    }
}
