use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use inquisitor_pipeline::validate_rule_file;
use inquisitor_rules::RuleKind;

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct RulesArgs {
    #[command(subcommand)]
    pub command: RulesCommand,
}

#[derive(Subcommand, Debug)]
pub enum RulesCommand {
    /// Compile a rule file and list its rules.
    Validate {
        /// Rule file path.
        path: PathBuf,
        /// Which classifier the rules are for.
        #[arg(long, value_enum, default_value = "threshold")]
        kind: KindArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Threshold,
    Gate,
}

impl From<KindArg> for RuleKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Threshold => Self::Threshold,
            KindArg::Gate => Self::Gate,
        }
    }
}

pub fn run(args: &RulesArgs, format: &OutputFormat) -> anyhow::Result<()> {
    match &args.command {
        RulesCommand::Validate { path, kind } => {
            let rules = validate_rule_file(path, (*kind).into())?;
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&rules)?);
                }
                OutputFormat::Text => {
                    println!("{} rules compiled from {}:", rules.len(), path.display());
                    for rule in &rules {
                        println!(
                            "  {id} {name:?} weight {weight} [{category}] {detail}",
                            id = rule.id,
                            name = rule.name,
                            weight = rule.weight,
                            category = rule.category,
                            detail = rule.detail,
                        );
                    }
                }
            }
        }
    }
    Ok(())
}
