use std::{marker::PhantomData, path::{Path, PathBuf}};
use tokio::fs;

use crate::errors::ServiceError;

/// Whole-value JSON file persistence.
///
/// The value is rewritten in full on every save through a temporary file and a
/// rename, so readers never observe a half-written document.
#[derive(Debug, Clone)]
pub struct JsonSnapshot<T> {
    file_path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonSnapshot<T>
where
    T: serde::Serialize + serde::de::DeserializeOwned + Default,
{
    /// Bind to a path, creating the parent directory and an empty document if missing.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<(Self, T), ServiceError> {
        let snapshot = Self { file_path: path.into(), _marker: PhantomData };
        common::env::ensure_data_dir(&snapshot.file_path)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        let value = match fs::read(&snapshot.file_path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => T::default(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ServiceError::Storage(format!("{} is not a valid snapshot: {e}", snapshot.file_path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty = T::default();
                snapshot.save(&empty).await?;
                empty
            }
            Err(e) => return Err(ServiceError::Storage(e.to_string())),
        };
        Ok((snapshot, value))
    }

    pub async fn save(&self, value: &T) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(value).map_err(|e| ServiceError::Storage(e.to_string()))?;
        let tmp = self.file_path.with_extension("json.tmp");
        fs::write(&tmp, data).await.map_err(|e| ServiceError::Storage(e.to_string()))?;
        fs::rename(&tmp, &self.file_path).await.map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}
