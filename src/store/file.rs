use super::KvStore;
use anyhow::{anyhow, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, DirBuilder, File};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

const APP_DIR_NAME: &str = ".tracker-session";
const TMP_SUFFIX: &str = "tmp";

/// One directory per namespace, one file per hex encoded key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub async fn open(base_dir: impl AsRef<Path>, namespace: &str) -> Result<Self> {
        let dir = base_dir.as_ref().join(namespace);

        DirBuilder::new().recursive(true).create(&dir).await?;

        Ok(Self { dir })
    }

    pub fn default_base_dir() -> Result<PathBuf> {
        let mut path = home::home_dir().ok_or(anyhow!("can't find home dir"))?;
        path.push(APP_DIR_NAME);

        Ok(path)
    }

    fn path_of(&self, key: &[u8]) -> PathBuf {
        self.dir.join(hex::encode(key))
    }
}

#[async_trait::async_trait]
impl KvStore for FileStore {
    async fn read(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let mut file = match File::open(self.path_of(key)).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut buf = Vec::new();
        file.read_to_end(&mut buf).await?;

        Ok(Some(buf))
    }

    async fn write(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let path = self.path_of(key);
        let tmp_path = path.with_extension(TMP_SUFFIX);

        let mut file = File::create(&tmp_path).await?;
        file.write_all(value).await?;
        file.sync_all().await?;
        drop(file);

        // readers see either the old or the new value
        fs::rename(&tmp_path, &path).await?;

        Ok(())
    }
}
