use image::{DynamicImage, ImageError, ImageReader, Limits};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use crate::error::{AppError, RenderError, Result};

/// The live imaging context, if any holder still has it
static CURRENT: Mutex<Weak<Imaging>> = Mutex::new(Weak::new());

/// Process-wide imaging context.
///
/// Holds the decoder limits every render shares. It is started by the first
/// `acquire` and shut down when the last `Arc` is dropped; acquiring while an
/// instance is alive hands out that same instance, as long as the requested
/// decoder limit matches it.
#[derive(Debug)]
pub struct Imaging {
    limits: Limits,
}

impl Imaging {
    /// Get the live imaging context, starting it if nobody holds one.
    ///
    /// The first holder's decoder limit wins for as long as the context lives.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a live context runs under a different
    /// decoder limit than `max_decode_bytes` asks for.
    pub fn acquire(max_decode_bytes: Option<u64>) -> Result<Arc<Self>> {
        let mut current = CURRENT.lock().unwrap_or_else(PoisonError::into_inner);
        let requested = Self::limits_for(max_decode_bytes);

        if let Some(live) = current.upgrade() {
            if live.max_alloc() != requested.max_alloc {
                return Err(AppError::Config(format!(
                    "imaging already running with decoder limit {:?}, cannot switch to {:?}",
                    live.max_alloc(),
                    requested.max_alloc
                )));
            }
            return Ok(live);
        }

        tracing::debug!("Imaging started (decoder allocation limit: {:?})", requested.max_alloc);
        let imaging = Arc::new(Self { limits: requested });
        *current = Arc::downgrade(&imaging);
        Ok(imaging)
    }

    fn limits_for(max_decode_bytes: Option<u64>) -> Limits {
        let mut limits = Limits::default();
        if max_decode_bytes.is_some() {
            limits.max_alloc = max_decode_bytes;
        }
        limits
    }

    /// Decoder allocation limit of this context
    pub fn max_alloc(&self) -> Option<u64> {
        self.limits.max_alloc
    }

    /// Decode the image at `path`, sniffing the format from its content.
    ///
    /// Any failure to read or decode the file is a `RenderError::Decode`.
    pub fn decode(&self, path: &Path) -> Result<DynamicImage, RenderError> {
        let decode_err = |source| RenderError::Decode {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|e| decode_err(ImageError::IoError(e)))?;
        reader.limits(self.limits.clone());
        reader.decode().map_err(decode_err)
    }
}

impl Drop for Imaging {
    fn drop(&mut self) {
        tracing::debug!("Imaging shut down");
    }
}
