use crate::adapters::geojson::GeoJsonMap;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

pub const SNAPSHOT_FILE: &str = "map.geojson";

/// Files under a base directory, created on first write.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn full_path(&self, path: &str) -> PathBuf {
        Path::new(&self.base_path).join(path)
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.full_path(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}

/// Writes the rendered map as pretty-printed GeoJSON to [`SNAPSHOT_FILE`].
pub async fn write_snapshot<S: Storage>(storage: &S, map: &GeoJsonMap) -> Result<usize> {
    let data = serde_json::to_vec_pretty(&map.to_geojson())?;
    storage.write_file(SNAPSHOT_FILE, &data).await?;
    tracing::debug!("Wrote {} bytes of GeoJSON", data.len());
    Ok(data.len())
}
