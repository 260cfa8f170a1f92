use crate::modules::Module;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Qualifier {
    Best,
    Last,
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Qualifier::Best => f.write_str("best"),
            Qualifier::Last => f.write_str("last"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    module: String,
    saved_at: DateTime<Utc>,
    state: Value,
}

/// Module parameters on disk, one zlib-compressed JSON file per module and
/// qualifier: `<dir>/<module>_<best|last>.ckpt`.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    dir: PathBuf,
}

impl CheckpointStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, module: &str, qualifier: Qualifier) -> PathBuf {
        self.dir.join(format!("{module}_{qualifier}.ckpt"))
    }

    pub fn save<M: Module + ?Sized>(&self, module: &M, qualifier: Qualifier) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path(module.name(), qualifier);
        let envelope = Envelope {
            module: module.name().to_string(),
            saved_at: Utc::now(),
            state: module.state_dict()?,
        };

        let mut encoder = ZlibEncoder::new(BufWriter::new(File::create(&path)?), Compression::default());
        serde_json::to_writer(&mut encoder, &envelope)?;
        encoder.finish()?.flush()?;

        info!(module = module.name(), path = %path.display(), "checkpoint saved");
        Ok(path)
    }

    /// Loads into `module` and returns when the checkpoint was written.
    pub fn load<M: Module + ?Sized>(&self, module: &mut M, qualifier: Qualifier) -> Result<DateTime<Utc>> {
        let path = self.path(module.name(), qualifier);
        let envelope = Self::read(&path)?;
        if envelope.module != module.name() {
            return Err(Error::ModuleMismatch {
                expected: module.name().to_string(),
                found: envelope.module,
            });
        }

        module.load_state_dict(envelope.state)?;
        Ok(envelope.saved_at)
    }

    /// Name of the module stored at `path`.
    pub fn module_at<P: AsRef<Path>>(path: P) -> Result<String> {
        Ok(Self::read(path.as_ref())?.module)
    }

    fn read(path: &Path) -> Result<Envelope> {
        let decoder = ZlibDecoder::new(BufReader::new(File::open(path)?));
        Ok(serde_json::from_reader(decoder)?)
    }
}
