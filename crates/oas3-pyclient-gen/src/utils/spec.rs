use std::{ffi::OsStr, path::Path, sync::Arc};

use anyhow::Context;
use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecFormat {
  #[default]
  Json,
  Yaml,
}

impl SpecFormat {
  #[must_use]
  pub fn from_extension(ext: &str) -> Self {
    match ext {
      "yaml" | "yml" => Self::Yaml,
      _ => Self::Json,
    }
  }
}

/// Memory-mapped OpenAPI document, parsed into an untyped tree.
///
/// The generator reads fragments by address and never needs a typed model,
/// so both formats end up as a `serde_json::Value` with key order preserved.
pub struct SpecLoader {
  file: AsyncMmapFile,
  format: SpecFormat,
}

impl SpecLoader {
  pub async fn open(path: &Path) -> anyhow::Result<Self> {
    let format = path
      .extension()
      .and_then(OsStr::to_str)
      .map_or(SpecFormat::default(), SpecFormat::from_extension);

    let file = AsyncMmapFile::open(path)
      .await
      .with_context(|| format!("opening {}", path.display()))?;

    Ok(Self { file, format })
  }

  pub fn parse(&self) -> anyhow::Result<Arc<Value>> {
    parse_document(self.file.as_slice(), self.format)
  }
}

pub(crate) fn parse_document(bytes: &[u8], format: SpecFormat) -> anyhow::Result<Arc<Value>> {
  let document = match format {
    SpecFormat::Json => serde_json::from_slice::<Value>(bytes).context("parsing JSON document")?,
    SpecFormat::Yaml => serde_yaml::from_slice::<Value>(bytes).context("parsing YAML document")?,
  };
  anyhow::ensure!(document.is_object(), "OpenAPI document root must be an object");
  Ok(Arc::new(document))
}
