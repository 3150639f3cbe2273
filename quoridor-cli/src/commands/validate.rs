use std::path::PathBuf;

use color_eyre::eyre::{eyre, Result, WrapErr};
use colored::Colorize;
use serde_json::Value;

use super::{parse_game, read_file};

#[derive(clap::Args, Debug)]
pub(crate) struct Validate {
    /// A saved game record, a list of them, or a bare game state
    #[clap(value_parser)]
    file: PathBuf,
}

impl Validate {
    pub(crate) fn run(self) -> Result<()> {
        let document: Value = serde_json::from_str(&read_file(&self.file)?)
            .wrap_err_with(|| format!("{} is not JSON", self.file.display()))?;

        let entries = match document {
            Value::Array(entries) => entries,
            single => vec![single],
        };

        let mut invalid = 0;
        for (index, entry) in entries.into_iter().enumerate() {
            let label = entry
                .get("id")
                .and_then(Value::as_str)
                .map_or_else(|| format!("#{index}"), |id| id.to_owned());

            match parse_game(entry) {
                Ok(state) => println!("{} {label}: {}", "✔".green(), state.description()),
                Err(e) => {
                    invalid += 1;
                    println!("{} {label}: {e}", "✘".red());
                }
            }
        }

        if invalid > 0 {
            return Err(eyre!("{invalid} saved games are invalid"));
        }

        Ok(())
    }
}
