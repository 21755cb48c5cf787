//! Durable snapshots of hall-of-fame genomes.
//!
//! Champions are stored as one pretty-printed JSON file per record under
//! `<base>/champions/`. A legacy single-record file at `<base>/champion.json`
//! (written by older sessions) is still recognized when reading and listing.
//!
//! Persistence failures are expected, recoverable events: every operation
//! returns `Result<String, ChampionStoreError>` where the `Ok` string is the
//! human-readable success message and the error's `Display` text the failure
//! message. Nothing here panics on missing or corrupt files, and a corrupt
//! record never aborts a listing.

use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strider_policy::Genome;

use crate::engine::EvolutionEngine;

/// Subdirectory holding one JSON file per saved champion.
const CHAMPIONS_DIR: &str = "champions";
/// Single-record file written by older sessions, kept readable.
const LEGACY_FILE_NAME: &str = "champion.json";

/// Persisted snapshot of a hall-of-fame genome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChampionRecord {
    pub name: String,
    pub genome: Genome,
    pub fitness: f32,
    pub generation: u32,
    /// Absent in records written before timestamps were added.
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl ChampionRecord {
    /// Reads and parses a champion record from a file.
    pub fn open(path: &Path) -> Result<Self, ChampionStoreError> {
        let file = File::open(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ChampionStoreError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ChampionStoreError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|source| ChampionStoreError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// One row of [`ChampionStore::list`] output.
#[derive(Debug, Clone)]
pub struct ChampionSummary {
    pub path: PathBuf,
    pub name: String,
    pub fitness: f32,
    pub generation: u32,
    pub saved_at: Option<DateTime<Utc>>,
}

/// Expected persistence failures, surfaced as values rather than panics.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ChampionStoreError {
    #[display("no champion recorded yet; complete at least one generation first")]
    NoChampion,
    #[display("champion file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[display("i/o error on {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("{} is not a valid champion record: {source}", path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[display("{} holds a genome with unexpected tensor shapes", path.display())]
    ShapeMismatch { path: PathBuf },
}

/// Durable storage for named snapshots of the best-ever genome.
#[derive(Debug, Clone)]
pub struct ChampionStore {
    base: PathBuf,
}

impl ChampionStore {
    #[must_use]
    pub fn new<P>(base: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self { base: base.into() }
    }

    /// Directory the per-champion files live in.
    #[must_use]
    pub fn champions_dir(&self) -> PathBuf {
        self.base.join(CHAMPIONS_DIR)
    }

    /// Well-known path of the legacy single-record file.
    #[must_use]
    pub fn legacy_path(&self) -> PathBuf {
        self.base.join(LEGACY_FILE_NAME)
    }

    /// Persists the engine's hall-of-fame genome under `name`.
    ///
    /// With no name given, one is derived from the truncated fitness, e.g.
    /// `champion_412pts`. Fails if no hall-of-fame genome exists yet.
    pub fn save(
        &self,
        engine: &EvolutionEngine,
        name: Option<&str>,
    ) -> Result<String, ChampionStoreError> {
        let genome = engine
            .global_best_genome()
            .ok_or(ChampionStoreError::NoChampion)?;
        let fitness = engine.global_best_fitness();
        let name = name.map_or_else(|| derived_name(fitness), str::to_owned);

        let record = ChampionRecord {
            name: name.clone(),
            genome: genome.clone(),
            fitness,
            generation: engine.generation(),
            saved_at: Some(Utc::now()),
        };
        let path = self.champions_dir().join(file_name_for(&name));
        write_record(&record, &path)?;
        Ok(format!("saved champion \"{name}\" to {}", path.display()))
    }

    /// Restores a champion record and installs it into the engine.
    ///
    /// The genome becomes the new hall-of-fame genome with its recorded
    /// fitness and a copy enters population slot 0 so it competes going
    /// forward.
    pub fn load(
        &self,
        engine: &mut EvolutionEngine,
        path: &Path,
    ) -> Result<String, ChampionStoreError> {
        let record = ChampionRecord::open(path)?;
        if !record.genome.has_expected_shapes() {
            return Err(ChampionStoreError::ShapeMismatch {
                path: path.to_path_buf(),
            });
        }
        let message = format!(
            "loaded champion \"{}\" ({:.1} pts, generation {})",
            record.name, record.fitness, record.generation
        );
        engine.install_champion(record.genome, record.fitness);
        Ok(message)
    }

    /// Enumerates every parseable champion record, best fitness first.
    ///
    /// Covers the champions directory and the legacy single-record file.
    /// Corrupt individual files are skipped; they never abort the listing.
    #[must_use]
    pub fn list(&self) -> Vec<ChampionSummary> {
        let mut entries = Vec::new();

        if let Ok(dir) = fs::read_dir(self.champions_dir()) {
            for entry in dir.flatten() {
                let path = entry.path();
                if path.extension().is_none_or(|ext| ext != "json") {
                    continue;
                }
                if let Ok(record) = ChampionRecord::open(&path) {
                    entries.push(summarize(record, path));
                }
            }
        }

        let legacy = self.legacy_path();
        if let Ok(record) = ChampionRecord::open(&legacy) {
            entries.push(summarize(record, legacy));
        }

        entries.sort_by(|a, b| {
            b.fitness
                .total_cmp(&a.fitness)
                .then_with(|| a.name.cmp(&b.name))
        });
        entries
    }

    /// Renames a stored champion, rewriting both the record and its file.
    ///
    /// Renaming the legacy single-record file migrates it into the
    /// champions directory.
    pub fn rename(&self, path: &Path, new_name: &str) -> Result<String, ChampionStoreError> {
        let mut record = ChampionRecord::open(path)?;
        let old_name = std::mem::replace(&mut record.name, new_name.to_owned());

        let new_path = self.champions_dir().join(file_name_for(new_name));
        write_record(&record, &new_path)?;
        if new_path != path {
            fs::remove_file(path).map_err(|source| ChampionStoreError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Ok(format!(
            "renamed \"{old_name}\" to \"{new_name}\" ({})",
            new_path.display()
        ))
    }

    /// Deletes a stored champion file.
    pub fn delete(&self, path: &Path) -> Result<String, ChampionStoreError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(format!("deleted {}", path.display())),
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                Err(ChampionStoreError::NotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(ChampionStoreError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

fn summarize(record: ChampionRecord, path: PathBuf) -> ChampionSummary {
    ChampionSummary {
        path,
        name: record.name,
        fitness: record.fitness,
        generation: record.generation,
        saved_at: record.saved_at,
    }
}

#[expect(clippy::cast_possible_truncation)]
fn derived_name(fitness: f32) -> String {
    format!("champion_{}pts", fitness as i64)
}

/// File name derived from a champion name; anything outside
/// `[A-Za-z0-9_-]` becomes `_` so names stay portable across filesystems.
fn file_name_for(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{stem}.json")
}

fn write_record(record: &ChampionRecord, path: &Path) -> Result<(), ChampionStoreError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| ChampionStoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    let file = File::create(path).map_err(|source| ChampionStoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, record).map_err(|source| {
        ChampionStoreError::Malformed {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer.flush().map_err(|source| ChampionStoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use crate::engine::{EngineParams, RetentionStrategy};

    use super::*;

    fn engine_with_champion(fitness: f32) -> EvolutionEngine {
        let params = EngineParams {
            population_size: 3,
            ..EngineParams::default()
        };
        let mut engine = EvolutionEngine::new(params, RetentionStrategy::HallOfFame);
        engine.next_generation(&[1.0, fitness, 2.0]);
        engine
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = ChampionStore::new(dir.path());
        let engine = engine_with_champion(42.5);
        let champion = engine.global_best_genome().unwrap().clone();

        let message = store.save(&engine, Some("trial")).unwrap();
        assert!(message.contains("trial"));

        let path = store.champions_dir().join("trial.json");
        let record = ChampionRecord::open(&path).unwrap();
        assert_eq!(record.name, "trial");
        assert_eq!(record.fitness, 42.5);
        assert_eq!(record.genome, champion);
        assert!(record.saved_at.is_some());

        let mut restored = EvolutionEngine::new(
            EngineParams {
                population_size: 3,
                ..EngineParams::default()
            },
            RetentionStrategy::HallOfFame,
        );
        store.load(&mut restored, &path).unwrap();
        assert_eq!(restored.global_best_fitness(), 42.5);
        assert_eq!(restored.global_best_genome().unwrap(), &champion);
        assert_eq!(&restored.population()[0], &champion);
    }

    #[test]
    fn test_save_derives_name_from_fitness() {
        let dir = TempDir::new().unwrap();
        let store = ChampionStore::new(dir.path());
        let engine = engine_with_champion(412.7);

        let message = store.save(&engine, None).unwrap();
        assert!(message.contains("champion_412pts"));
        assert!(store.champions_dir().join("champion_412pts.json").exists());
    }

    #[test]
    fn test_save_without_hall_of_fame_genome_fails() {
        let dir = TempDir::new().unwrap();
        let store = ChampionStore::new(dir.path());
        let engine = EvolutionEngine::new(EngineParams::default(), RetentionStrategy::HallOfFame);

        let err = store.save(&engine, None).unwrap_err();
        assert!(matches!(err, ChampionStoreError::NoChampion));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let store = ChampionStore::new(dir.path());
        let mut engine = engine_with_champion(1.0);

        let err = store
            .load(&mut engine, &dir.path().join("absent.json"))
            .unwrap_err();
        assert!(matches!(err, ChampionStoreError::NotFound { .. }));
    }

    #[test]
    fn test_load_rejects_wrong_tensor_shapes() {
        let dir = TempDir::new().unwrap();
        let store = ChampionStore::new(dir.path());
        let path = dir.path().join("bad_shape.json");
        fs::write(
            &path,
            r#"{"name":"bad","genome":{"w1":[0.5],"b1":[0.0],"w2":[0.1],"b2":[0.2]},"fitness":9.0,"generation":3}"#,
        )
        .unwrap();

        let mut engine = engine_with_champion(1.0);
        let err = store.load(&mut engine, &path).unwrap_err();
        assert!(matches!(err, ChampionStoreError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_list_sorts_by_fitness_and_skips_corrupt_files() {
        let dir = TempDir::new().unwrap();
        let store = ChampionStore::new(dir.path());

        store
            .save(&engine_with_champion(10.0), Some("bronze"))
            .unwrap();
        store
            .save(&engine_with_champion(30.0), Some("gold"))
            .unwrap();
        store
            .save(&engine_with_champion(20.0), Some("silver"))
            .unwrap();
        fs::write(store.champions_dir().join("corrupt.json"), "not json").unwrap();

        let listed = store.list();
        let names: Vec<&str> = listed.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["gold", "silver", "bronze"]);
    }

    #[test]
    fn test_list_includes_legacy_single_record_file() {
        let dir = TempDir::new().unwrap();
        let store = ChampionStore::new(dir.path());

        store
            .save(&engine_with_champion(5.0), Some("recent"))
            .unwrap();

        let engine = engine_with_champion(99.0);
        let legacy = ChampionRecord {
            name: "veteran".to_owned(),
            genome: engine.global_best_genome().unwrap().clone(),
            fitness: 99.0,
            generation: 7,
            saved_at: None,
        };
        let file = File::create(store.legacy_path()).unwrap();
        serde_json::to_writer(file, &legacy).unwrap();

        let listed = store.list();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "veteran");
        assert_eq!(listed[0].path, store.legacy_path());
        assert_eq!(listed[0].saved_at, None);
        assert_eq!(listed[1].name, "recent");
    }

    #[test]
    fn test_rename_rewrites_record_and_file() {
        let dir = TempDir::new().unwrap();
        let store = ChampionStore::new(dir.path());
        store
            .save(&engine_with_champion(11.0), Some("draft"))
            .unwrap();

        let old_path = store.champions_dir().join("draft.json");
        store.rename(&old_path, "final").unwrap();

        assert!(!old_path.exists());
        let new_path = store.champions_dir().join("final.json");
        let record = ChampionRecord::open(&new_path).unwrap();
        assert_eq!(record.name, "final");
        assert_eq!(record.fitness, 11.0);
    }

    #[test]
    fn test_delete_removes_file_and_reports_missing() {
        let dir = TempDir::new().unwrap();
        let store = ChampionStore::new(dir.path());
        store
            .save(&engine_with_champion(3.0), Some("ephemeral"))
            .unwrap();

        let path = store.champions_dir().join("ephemeral.json");
        store.delete(&path).unwrap();
        assert!(!path.exists());

        let err = store.delete(&path).unwrap_err();
        assert!(matches!(err, ChampionStoreError::NotFound { .. }));
    }

    #[test]
    fn test_file_name_sanitizes_awkward_characters() {
        assert_eq!(file_name_for("fast runner #2"), "fast_runner__2.json");
        assert_eq!(file_name_for("champion_412pts"), "champion_412pts.json");
    }
}
