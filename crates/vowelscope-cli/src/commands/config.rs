//! Analysis config commands.

use clap::{Args, Subcommand};
use std::path::PathBuf;
use vowelscope_config::{AnalysisConfig, PROFILE_NAMES, get_profile};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print a built-in profile as TOML
    Show {
        /// Profile name
        #[arg(default_value = "default")]
        profile: String,
    },

    /// Write a built-in profile to a file as a starting point
    Init {
        /// Output TOML file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Profile to start from
        #[arg(long, default_value = "default")]
        profile: String,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Check a config file for errors
    Validate {
        /// TOML file to check
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// List built-in profiles
    Profiles,
}

pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show { profile } => {
            print!("{}", get_profile(&profile)?.to_toml()?);
        }

        ConfigCommand::Init {
            output,
            profile,
            force,
        } => {
            if output.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    output.display()
                );
            }
            get_profile(&profile)?.save(&output)?;
            println!("Wrote profile '{}' to {}", profile, output.display());
        }

        ConfigCommand::Validate { file } => {
            let config = AnalysisConfig::load(&file)?;
            config.validate()?;
            println!(
                "{}: ok (pitch {}, formant {}, {} / {})",
                file.display(),
                config.pitch.algorithm,
                config.formant.algorithm,
                config.fft_size,
                config.hop_size
            );
        }

        ConfigCommand::Profiles => {
            println!("Built-in profiles:");
            for name in PROFILE_NAMES {
                let config = get_profile(name)?;
                println!(
                    "  {:<8} pitch {:<15} formant {:<18} frame {:>5} hop {:>5}",
                    name,
                    config.pitch.algorithm.name(),
                    config.formant.algorithm.name(),
                    config.fft_size,
                    config.hop_size
                );
            }
        }
    }
    Ok(())
}
