//! FILENAME: model/src/pool.rs
//! PURPOSE: Deduplication context for shared recons.
//! CONTEXT: Cells only write the id of their recon. The caller threads a
//! `Pool` through every save/load of a batch of cells so that each shared
//! recon is written exactly once and cells loaded afterwards point at the
//! same `Arc<Recon>` again.

use crate::error::{ModelError, ModelResult};
use crate::recon::Recon;
use rustc_hash::FxHashMap;
use std::sync::Arc;

#[derive(Debug, Default, Clone)]
pub struct Pool {
    recons: FxHashMap<i64, Arc<Recon>>,
}

impl Pool {
    pub fn new() -> Self {
        Pool {
            recons: FxHashMap::default(),
        }
    }

    /// Registers a recon and returns the id cells should refer to it by.
    /// A recon with an id that is already pooled is not registered twice.
    pub fn pool(&mut self, recon: &Arc<Recon>) -> i64 {
        self.recons
            .entry(recon.id)
            .or_insert_with(|| Arc::clone(recon));
        recon.id
    }

    pub fn get_recon(&self, id: i64) -> Option<Arc<Recon>> {
        self.recons.get(&id).cloned()
    }

    /// Resolves the textual id found in a serialized cell.
    pub fn resolve(&self, id_text: &str) -> ModelResult<Arc<Recon>> {
        let id: i64 = id_text
            .trim()
            .parse()
            .map_err(|_| ModelError::InvalidReconId(id_text.to_string()))?;
        self.get_recon(id)
            .ok_or_else(|| ModelError::UnknownRecon(id_text.to_string()))
    }

    pub fn len(&self) -> usize {
        self.recons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recons.is_empty()
    }

    /// Writes one recon per line, ordered by id.
    pub fn save(&self) -> ModelResult<String> {
        let mut ids: Vec<&i64> = self.recons.keys().collect();
        ids.sort();

        let mut out = String::new();
        for id in ids {
            out.push_str(&serde_json::to_string(self.recons[id].as_ref())?);
            out.push('\n');
        }
        Ok(out)
    }

    /// Reads the format written by [`Pool::save`]. Blank lines are skipped.
    pub fn load(text: &str) -> ModelResult<Pool> {
        let mut pool = Pool::new();
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            let recon: Recon = serde_json::from_str(line)?;
            pool.recons.insert(recon.id, Arc::new(recon));
        }
        log::debug!("loaded {} pooled recons", pool.len());
        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pooling_is_idempotent() {
        let mut pool = Pool::new();
        let recon = Arc::new(Recon::new(7, "svc"));
        assert_eq!(pool.pool(&recon), 7);
        assert_eq!(pool.pool(&Arc::clone(&recon)), 7);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn resolve_reports_unknown_and_malformed_ids() {
        let mut pool = Pool::new();
        pool.pool(&Arc::new(Recon::new(7, "svc")));

        assert!(pool.resolve("7").is_ok());
        assert!(matches!(pool.resolve("8"), Err(ModelError::UnknownRecon(_))));
        assert!(matches!(pool.resolve("x"), Err(ModelError::InvalidReconId(_))));
    }

    #[test]
    fn save_then_load_keeps_every_recon() {
        let mut pool = Pool::new();
        pool.pool(&Arc::new(Recon::new(2, "a")));
        pool.pool(&Arc::new(Recon::new(1, "b")));

        let text = pool.save().unwrap();
        assert!(text.starts_with("{\"id\":1"));

        let loaded = Pool::load(&text).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get_recon(2).unwrap().service, "a");
    }
}
