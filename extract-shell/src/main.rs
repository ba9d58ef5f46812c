use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{info, warn};
use shell_util_rust::{
    extract_shell, ArcFile, ClusterFile, DanglingBondPolicy, ExtractConfig, NumericPolicy,
    SelectionPolicy, DEFAULT_REFERENCE_ID,
};
use std::path::PathBuf;

/// Cut the shell around a reference atom out of an .arc snapshot and save it renumbered
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Input .arc file
    #[arg(default_value = "tail.arc")]
    input_file: PathBuf,

    /// Resulting .xyz file
    #[arg(default_value = "tail.xyz")]
    output_file: PathBuf,

    #[arg(short, long, value_enum, default_value_t = Policy::Direct)]
    policy: Policy,

    /// Shell radius (A), 2.8 for direct and 3.1 for coordination if not set
    #[arg(short, long)]
    radius: Option<f64>,

    /// Id of the atom in the shell center
    #[arg(long, default_value_t = DEFAULT_REFERENCE_ID)]
    reference_id: i64,

    /// Fail on numeric fields that do not parse instead of reading them as 0
    #[arg(long)]
    strict: bool,

    #[arg(long, value_enum, default_value_t = Dangling::Drop)]
    dangling: Dangling,

    /// Keep one copy of atoms reached more than once by the coordination policy
    #[arg(long)]
    collapse_duplicates: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Policy {
    /// Atoms closer than the radius
    Direct,
    /// Atoms closer than the radius and everything they bond to
    Coordination,
}

#[derive(Clone, Copy, ValueEnum)]
enum Dangling {
    /// Write 0 for bonds to atoms outside the shell
    Legacy,
    /// Remove bonds to atoms outside the shell
    Drop,
}

impl Cli {
    fn config(&self) -> ExtractConfig {
        let policy = match self.policy {
            Policy::Direct => SelectionPolicy::Direct,
            Policy::Coordination => SelectionPolicy::Coordination,
        };
        let mut config = ExtractConfig::new(policy);
        if let Some(radius) = self.radius {
            config.radius = radius;
        }
        config.reference_id = self.reference_id;
        config.dangling = match self.dangling {
            Dangling::Legacy => DanglingBondPolicy::Legacy,
            Dangling::Drop => DanglingBondPolicy::Drop,
        };
        config.collapse_duplicates = self.collapse_duplicates;
        config
    }

    fn numeric_policy(&self) -> NumericPolicy {
        if self.strict {
            NumericPolicy::Strict
        } else {
            NumericPolicy::Lenient
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = cli.config();
    let arc = ArcFile::read(&cli.input_file, cli.numeric_policy())?;
    if arc.substituted_fields > 0 {
        warn!("{} numeric fields read as 0", arc.substituted_fields);
    }
    info!("Loaded {} atoms", arc.structure().len());
    let extraction = extract_shell(arc.structure(), &config)?;
    if let Some(n) = extraction.coordination_number {
        println!("coordination number: {n}");
    }
    if !extraction.dangling.is_empty() {
        warn!("{} dangling bonds", extraction.dangling.len());
    }
    ClusterFile::new(&extraction.atoms).save(&cli.output_file)?;
    info!(
        "saved {} atoms to {}",
        extraction.atoms.len(),
        cli.output_file.to_string_lossy()
    );
    Ok(())
}
