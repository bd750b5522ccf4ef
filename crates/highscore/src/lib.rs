use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

/// On-disk format: a single JSON document, `{ "high_score": 42 }`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ScoreDoc {
    high_score: u64,
}

/// Persisted best-round record. The simulation core never touches this;
/// drivers read it once at startup and write it at round end.
pub trait ScoreStore {
    fn load(&self) -> io::Result<u64>;
    fn save(&mut self, score: u64) -> io::Result<()>;
}

#[derive(Clone, Debug)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ScoreStore for FileScoreStore {
    /// A missing file reads as 0; malformed JSON is an `InvalidData` error.
    fn load(&self) -> io::Result<u64> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e),
        };
        let doc: ScoreDoc = serde_json::from_str(&text)?;
        Ok(doc.high_score)
    }

    fn save(&mut self, score: u64) -> io::Result<()> {
        let doc = ScoreDoc { high_score: score };
        fs::write(&self.path, serde_json::to_string_pretty(&doc)?)
    }
}

/// In-process store for tests and runs without persistence.
#[derive(Clone, Copy, Debug, Default)]
pub struct MemoryScoreStore {
    score: u64,
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> io::Result<u64> {
        Ok(self.score)
    }

    fn save(&mut self, score: u64) -> io::Result<()> {
        self.score = score;
        Ok(())
    }
}

/// Round-end protocol: persist `floor(points)` only when it beats the stored
/// record. Returns the new record when one was written.
pub fn bank(store: &mut dyn ScoreStore, points: f64) -> io::Result<Option<u64>> {
    let banked = points.max(0.0).floor() as u64;
    let best = store.load()?;
    if banked > best {
        store.save(banked)?;
        return Ok(Some(banked));
    }
    Ok(None)
}
