use std::path::PathBuf;

use clap::Subcommand;
use strider_evolution::{ChampionRecord, ChampionStore};

use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ChampionArg {
    /// Directory holding the champion store
    #[arg(long, default_value = "models")]
    store_dir: PathBuf,
    #[command(subcommand)]
    action: ChampionAction,
}

#[derive(Debug, Clone, Subcommand)]
enum ChampionAction {
    /// List stored champions, best first
    List,
    /// Print a champion record as JSON
    Show {
        path: PathBuf,
        /// Output file path
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Rename a stored champion
    Rename { path: PathBuf, new_name: String },
    /// Delete a stored champion
    Delete { path: PathBuf },
}

pub(crate) fn run(arg: &ChampionArg) -> anyhow::Result<()> {
    let store = ChampionStore::new(&arg.store_dir);
    match &arg.action {
        ChampionAction::List => {
            let champions = store.list();
            if champions.is_empty() {
                eprintln!("no champions stored under {}", arg.store_dir.display());
                return Ok(());
            }
            eprintln!("{:>10}  {:>4}  {:<24}  {:<17}  path", "fitness", "gen", "name", "saved at");
            for champion in &champions {
                let saved_at = champion.saved_at.map_or_else(
                    || "-".to_owned(),
                    |at| at.format("%Y-%m-%d %H:%M").to_string(),
                );
                eprintln!(
                    "{:>10.1}  {:>4}  {:<24}  {:<17}  {}",
                    champion.fitness,
                    champion.generation,
                    champion.name,
                    saved_at,
                    champion.path.display()
                );
            }
            Ok(())
        }
        ChampionAction::Show { path, output } => {
            let record = ChampionRecord::open(path)?;
            Output::save_json(&record, output.clone())
        }
        ChampionAction::Rename { path, new_name } => {
            let message = store.rename(path, new_name)?;
            eprintln!("{message}");
            Ok(())
        }
        ChampionAction::Delete { path } => {
            let message = store.delete(path)?;
            eprintln!("{message}");
            Ok(())
        }
    }
}
