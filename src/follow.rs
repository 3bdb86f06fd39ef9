use std::io::{self, Read, Write};
use std::thread::{self, JoinHandle};

use crate::error::{LaunchError, Result};

const CHUNK_SIZE: usize = 8 * 1024;
const THREAD_NAME: &str = "appstart-follow";

/// Copy `reader` into `writer` chunk by chunk until end-of-stream
///
/// Bytes are written as they arrive and flushed after every chunk.
/// Returns the number of bytes relayed.
pub fn relay<R: Read, W: Write>(mut reader: R, mut writer: W) -> io::Result<u64> {
    let mut buf = [0u8; CHUNK_SIZE];
    let mut total = 0u64;

    loop {
        let read = match reader.read(&mut buf) {
            Ok(0) => return Ok(total),
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        writer.write_all(&buf[..read])?;
        writer.flush()?;
        total += read as u64;
    }
}

/// Background thread relaying the child's combined output
#[derive(Debug)]
pub struct OutputFollower {
    handle: JoinHandle<Result<u64>>,
}

impl OutputFollower {
    /// Start relaying `output` to the launcher's stdout
    pub fn start<R>(output: R) -> Result<Self>
    where
        R: Read + Send + 'static,
    {
        Self::start_with(output, io::stdout())
    }

    /// Start relaying `output` to `writer`
    pub fn start_with<R, W>(output: R, writer: W) -> Result<Self>
    where
        R: Read + Send + 'static,
        W: Write + Send + 'static,
    {
        tracing::info!("starting follower thread");
        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || match relay(output, writer) {
                Ok(total) => {
                    tracing::debug!("child output closed after {total} bytes");
                    Ok(total)
                }
                Err(err) => {
                    tracing::error!("error following child output: {err}");
                    Err(LaunchError::Relay(err))
                }
            })?;

        Ok(Self { handle })
    }

    /// Wait for the relay to reach end-of-stream or fail
    pub fn join(self) -> Result<u64> {
        self.handle
            .join()
            .unwrap_or_else(|_| Err(LaunchError::Relay(io::Error::other("follower thread panicked"))))
    }
}
