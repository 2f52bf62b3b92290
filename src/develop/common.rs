pub mod error;

pub use error::{DevelopError, Result};

/// Allocate a filled `Vec` without aborting on allocation failure.
///
/// The float cache and the output byte buffer are the only allocations in
/// the pipeline large enough to plausibly fail; they are routed through
/// here so the failure surfaces as [`DevelopError::OutOfMemory`].
pub(crate) fn try_filled_vec<T: Clone>(value: T, len: usize) -> Result<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|e| DevelopError::OutOfMemory(format!("{len} elements: {e}")))?;
    buffer.resize(len, value);
    Ok(buffer)
}
