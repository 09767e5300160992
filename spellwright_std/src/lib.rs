//! Command-line front end for the spell-checking engine: resolves a
//! dictionary name against the search path, loads it, and either runs
//! the ispell-compatible pipe-mode loop or checks a batch of text
//! files. The CLI, interactive loop, pipe-mode protocol, and option
//! parsing all live here, consuming `spellwright_core`'s public
//! `SpellerImpl`.

pub mod dictfile;
pub mod dictpath;
pub mod pipe;
pub mod tokenize;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use spellwright_core::config::Config;
use spellwright_core::speller::SpellerImpl;

use pipe::PipeMode;

#[derive(Parser, Debug)]
#[command(name = "spellwright", version, about = "A spell-checking lookup and suggestion engine")]
pub struct Cli {
    /// dictionary name (searched on SPELLWRIGHT_DICPATH/DICPATH) or a
    /// path without its .aff/.dic extension
    #[arg(short = 'd', long = "dict")]
    pub dict: Option<String>,

    /// ispell-compatible pipe mode: read lines of text, reply with
    /// status and suggestions for each word
    #[arg(short = 'a')]
    pub pipe_all: bool,

    /// pipe mode, listing only misspelled words
    #[arg(short = 'l')]
    pub pipe_list: bool,

    #[arg(long)]
    pub ignore_case: bool,

    /// ultra, fast, normal, slow, bad-spellers, soundslike
    #[arg(long, default_value = "normal")]
    pub sug_mode: String,

    #[arg(long)]
    pub camel_case: bool,

    #[arg(long)]
    pub run_together: bool,

    #[arg(long)]
    pub personal: Option<PathBuf>,

    #[arg(long)]
    pub repl: Option<PathBuf>,

    /// text files to check instead of reading from standard input
    pub files: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Runs the offline dictionary build pipeline, writing a `.rws`
    /// read-only dictionary file from an `.aff`/`.dic` source pair.
    BuildDict {
        #[arg(long)]
        aff: PathBuf,
        #[arg(long)]
        dic: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value = "en")]
        lang: String,
    },
}

pub fn run() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if let Some(Command::BuildDict { aff, dic, out, lang }) = &cli.command {
        return dictfile::build_dict(aff, dic, out, lang);
    }

    let dict_name = cli.dict.as_deref().unwrap_or("en");
    let dirs = dictpath::search_dirs();
    let base = dictpath::find_with_ext(dict_name, "aff", &dirs)
        .map(|p| p.with_extension(""))
        .with_context(|| format!("no .aff file found for '{dict_name}' on the dictionary search path"))?;
    info!("loading dictionary {}", base.display());

    let config = Config {
        lang_code: dict_name.to_string(),
        ignore_case: cli.ignore_case,
        sug_mode: cli.sug_mode.clone(),
        camel_case: cli.camel_case,
        run_together: cli.run_together,
        ..Config::default()
    };
    let mut speller = dictfile::load_speller(&base, dict_name, config)?;
    attach_writable_dicts(&mut speller, &cli)?;

    if cli.pipe_all || cli.pipe_list {
        let mode = if cli.pipe_all { PipeMode::All } else { PipeMode::ListOnly };
        let stdin = io::stdin();
        pipe::run(&mut speller, mode, stdin.lock(), io::stdout().lock())?;
        speller.synchronize()?;
        return Ok(());
    }

    if cli.files.is_empty() {
        bail!("nothing to do: pass -a/-l for pipe mode, or one or more text files to check");
    }
    for path in &cli.files {
        check_file(&speller, path)?;
    }
    Ok(())
}

fn attach_writable_dicts(speller: &mut SpellerImpl, cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.personal {
        if path.is_file() {
            let dict = spellwright_core::writable::WritableDict::load(path)?;
            speller.attach_personal_dict(dict);
        }
    }
    if let Some(path) = &cli.repl {
        if path.is_file() {
            let dict = spellwright_core::writable::ReplacementDict::load(path)?;
            speller.attach_replacement_dict(dict);
        }
    }
    Ok(())
}

/// Batch-checks one text file, printing misspelled words with their
/// line number (the behavior of a plain `-l`-style run over a file
/// instead of standard input).
fn check_file(speller: &SpellerImpl, path: &PathBuf) -> Result<()> {
    let file = File::open(path).with_context(|| format!("reading {}", path.display()))?;
    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        for (word, _) in tokenize::words(line.as_bytes()) {
            if !speller.check(word) {
                println!("{}:{}: {}", path.display(), line_no + 1, String::from_utf8_lossy(word));
            }
        }
    }
    Ok(())
}
