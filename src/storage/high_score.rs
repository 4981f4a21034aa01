use log::{info, warn};

use super::store::KeyValueStore;

/// Key the best score is stored under
pub const HIGH_SCORE_KEY: &str = "snakeHighScore";

/// Best score across games, mirrored to a durable store
pub struct HighScore<S> {
    store: S,
    best: u32,
}

impl<S: KeyValueStore> HighScore<S> {
    /// Read the stored best score.
    ///
    /// A missing entry means no game has been recorded yet; an unreadable or
    /// malformed one is logged and treated the same way.
    pub fn load(store: S) -> Self {
        let best = match store.get(HIGH_SCORE_KEY) {
            Ok(Some(raw)) => raw.trim().parse::<u32>().unwrap_or_else(|err| {
                warn!("ignoring stored high score {:?}: {}", raw, err);
                0
            }),
            Ok(None) => 0,
            Err(err) => {
                warn!("could not read high score: {:#}", err);
                0
            }
        };

        Self { store, best }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Record a final score, persisting it when it beats the best.
    ///
    /// Returns true when the best score changed.
    pub fn record(&mut self, score: u32) -> bool {
        if score <= self.best {
            return false;
        }

        self.best = score;
        info!("new high score {}", score);
        if let Err(err) = self.store.set(HIGH_SCORE_KEY, &score.to_string()) {
            warn!("could not save high score: {:#}", err);
        }
        true
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
