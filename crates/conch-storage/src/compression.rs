//! Report payload codecs, selected per record by its compression tag.

use conch_core::errors::StorageError;
use conch_core::types::Compression;

/// zstd level for report payloads. XML compresses well even at low levels.
const ZSTD_LEVEL: i32 = 3;

pub fn compress(data: &[u8], compression: Compression) -> Result<Vec<u8>, StorageError> {
    match compression {
        Compression::None => Ok(data.to_vec()),
        Compression::Zstd => {
            zstd::encode_all(data, ZSTD_LEVEL).map_err(|e| StorageError::Compression {
                scheme: compression.name().to_string(),
                message: e.to_string(),
            })
        }
    }
}

pub fn decompress(data: &[u8], compression: Compression) -> Result<Vec<u8>, StorageError> {
    match compression {
        Compression::None => Ok(data.to_vec()),
        Compression::Zstd => zstd::decode_all(data).map_err(|e| StorageError::Compression {
            scheme: compression.name().to_string(),
            message: e.to_string(),
        }),
    }
}
