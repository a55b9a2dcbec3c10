use super::*;
use rbb_competition::Competition;
use rbb_competition::CompetitionRecord;
use rbb_core::MatchId;
use rbb_gameplay::Match;
use std::path::Path;
use std::sync::Arc;

/// Name of the competition header document.
pub const COMPETITION_FILE: &str = "competition.json";

/// Name of the document holding match `id`.
pub fn match_file(id: MatchId) -> String {
    format!("match-{}.json", id)
}

/// Snapshots of one competition: a compact header plus one document
/// per match, so a busy match never rewrites the whole competition.
pub struct Archive {
    storage: Arc<dyn Storage>,
    writer: Writer,
}

impl Archive {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            writer: Writer::new(storage.clone()),
            storage,
        }
    }
    /// Archive backed by files under `dir`.
    pub async fn disk(dir: impl AsRef<Path>) -> Result<Self, SaveError> {
        Ok(Self::new(Arc::new(Disk::open(dir).await?)))
    }
    /// Schedule every match document, then the header.
    pub async fn save_all(&self, competition: &Competition) -> Result<(), SaveError> {
        for game in competition.matches() {
            self.save_match(game).await?;
        }
        let bytes = encode(&competition.record())?;
        self.writer.write(COMPETITION_FILE, bytes).await;
        Ok(())
    }
    /// Schedule one match document.
    pub async fn save_match(&self, game: &Match) -> Result<(), SaveError> {
        let bytes = encode(game)?;
        self.writer.write(match_file(game.id()), bytes).await;
        Ok(())
    }
    /// Wait until every scheduled document is written.
    pub async fn flush(&self) {
        self.writer.flush().await;
    }
    /// Rebuild the stored competition. A missing or unreadable header
    /// means there is nothing to resume.
    pub async fn load(&self, seed: Option<u64>) -> Result<Competition, SaveError> {
        let record = match self.storage.read(COMPETITION_FILE).await {
            Ok(Some(bytes)) => match decode::<CompetitionRecord>(&bytes) {
                Ok(record) => record,
                Err(e @ SaveError::Version { .. }) => return Err(e),
                Err(e) => {
                    log::warn!("[save] unreadable header: {}", e);
                    return Err(SaveError::NoSavedState);
                }
            },
            Ok(None) => return Err(SaveError::NoSavedState),
            Err(e) => {
                log::warn!("[save] cannot read header: {}", e);
                return Err(SaveError::NoSavedState);
            }
        };
        let mut matches = Vec::new();
        for id in match_ids(&record) {
            let name = match_file(id);
            let bytes = self
                .storage
                .read(&name)
                .await?
                .ok_or_else(|| SaveError::Corrupt(format!("{} is missing", name)))?;
            matches.push(decode::<Match>(&bytes)?);
        }
        log::info!(
            "[save] loaded {} with {} matches",
            record.name,
            matches.len()
        );
        Ok(Competition::restore(record, matches, seed)?)
    }
}

/// Every match the header refers to.
fn match_ids(record: &CompetitionRecord) -> Vec<MatchId> {
    let swiss = record.swiss.iter().flat_map(|s| s.match_ids.iter());
    let elimination = record.elimination.iter().flat_map(|s| s.match_ids.iter());
    let exhibition = record.exhibition.match_ids.iter();
    swiss.chain(elimination).chain(exhibition).copied().collect()
}
