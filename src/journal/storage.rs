use std::{future::Future, io::ErrorKind, path::PathBuf};

use anyhow::Result;
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
};
use tracing::{debug, warn};

use super::entities::Activity;

/// Interface for abstracting persistence of the journal. The collection is
/// always loaded and saved whole, there is no incremental write.
pub trait JournalStorage {
    fn load(&self) -> impl Future<Output = Result<Vec<Activity>>> + Send;

    fn save(&self, activities: &[Activity]) -> impl Future<Output = Result<()>> + Send;
}

/// File-backed [JournalStorage], one json record per line.
pub struct FileJournalStorage {
    path: PathBuf,
}

impl FileJournalStorage {
    pub fn new(path: PathBuf) -> Result<Self, std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    async fn load_inner(&self) -> std::result::Result<Vec<Activity>, std::io::Error> {
        debug!("Loading journal from {:?}", self.path);
        let file = File::open(&self.path).await?;
        file.lock_shared()?;
        let buffer = BufReader::new(file);
        let mut lines = buffer.lines();
        let mut activities = vec![];
        while let Ok(Some(v)) = lines.next_line().await {
            if v.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Activity>(&v) {
                Ok(v) => activities.push(v),
                Err(e) => {
                    // ignore illegal values. Might happen after shutdowns
                    warn!(
                        "During parsing in path {:?} found illegal json string {}: {e}",
                        self.path, &v
                    )
                }
            }
        }

        lines.into_inner().into_inner().unlock_async().await?;

        Ok(activities)
    }
}

impl JournalStorage for FileJournalStorage {
    async fn load(&self) -> Result<Vec<Activity>> {
        match self.load_inner().await {
            Ok(v) => Ok(v),
            // An absent file is simply an empty journal.
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(vec![]),
            Err(e) => Err(e)?,
        }
    }

    async fn save(&self, activities: &[Activity]) -> Result<()> {
        let mut file = File::options()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .await?;

        file.lock_exclusive()?;
        let result = Self::write_all_records(&mut file, activities).await;
        file.unlock_async().await?;
        result
    }
}

impl FileJournalStorage {
    async fn write_all_records(file: &mut File, activities: &[Activity]) -> Result<()> {
        // Old content is dropped only once the exclusive lock is held.
        file.set_len(0).await?;

        let mut buffer = Vec::<u8>::new();
        for activity in activities {
            serde_json::to_writer(&mut buffer, activity)?;
            buffer.push(b'\n');
        }

        file.write_all(&buffer).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use anyhow::Result;
    use tempfile::tempdir;

    use crate::{
        journal::entities::{Activity, Category},
        utils::logging::TEST_LOGGING,
    };

    use super::{FileJournalStorage, JournalStorage};

    fn activity(id: u64, hours: f64) -> Activity {
        Activity {
            id,
            title: format!("activity {id}"),
            category: Category::Family,
            start: "2024-01-01".parse().unwrap(),
            end: Some("2024-01-02".parse().unwrap()),
            hours,
            notes: "some notes".into(),
        }
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() -> Result<()> {
        let dir = tempdir()?;
        let storage = FileJournalStorage::new(dir.path().join("journal.jsonl"))?;
        assert_eq!(storage.load().await?, vec![]);
        Ok(())
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() -> Result<()> {
        let dir = tempdir()?;
        let storage = FileJournalStorage::new(dir.path().join("journal.jsonl"))?;
        let activities = vec![activity(1, 4.), activity(2, 0.), activity(3, 2.5)];

        storage.save(&activities).await?;

        assert_eq!(storage.load().await?, activities);
        Ok(())
    }

    #[tokio::test]
    async fn test_save_replaces_previous_content() -> Result<()> {
        let dir = tempdir()?;
        let storage = FileJournalStorage::new(dir.path().join("journal.jsonl"))?;

        storage.save(&[activity(1, 4.), activity(2, 1.)]).await?;
        storage.save(&[activity(2, 1.)]).await?;

        assert_eq!(storage.load().await?, vec![activity(2, 1.)]);

        // A shrinking rewrite must not leave a tail of the old content.
        let raw = std::fs::read_to_string(dir.path().join("journal.jsonl"))?;
        assert_eq!(raw.lines().count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_lines_are_skipped() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let path = dir.path().join("journal.jsonl");

        let mut file = std::fs::File::create(&path)?;
        serde_json::to_writer(&file, &activity(1, 4.))?;
        file.write_all(b"\n{not valid json\n")?;
        serde_json::to_writer(&file, &activity(2, 2.))?;
        file.write_all(b"\n")?;
        drop(file);

        let storage = FileJournalStorage::new(path)?;
        assert_eq!(storage.load().await?, vec![activity(1, 4.), activity(2, 2.)]);
        Ok(())
    }

    #[tokio::test]
    async fn test_garbage_file_degrades_to_empty() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let path = dir.path().join("journal.jsonl");
        std::fs::write(&path, "complete nonsense\n")?;

        let storage = FileJournalStorage::new(path)?;
        assert_eq!(storage.load().await?, vec![]);
        Ok(())
    }
}
