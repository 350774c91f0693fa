//! Command-line options for the tracklet binary.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracklet::protocol::{HabitKind, MeasurementField};

/// Track habits and body measurements, and chat with the assistant.
#[derive(Debug, Parser)]
#[command(name = "tracklet", version)]
pub struct Cli {
    /// Extra tracklet.json5 files applied over the user and cwd layers
    #[arg(long = "config", global = true)]
    pub config: Vec<PathBuf>,
    /// Send to the test webhook instead of production
    #[arg(long, global = true)]
    pub test_endpoint: bool,
    /// Print the request URL instead of sending it
    #[arg(long, global = true)]
    pub dry_run: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record today's habits
    Habit(HabitArgs),
    /// Submit body measurements for analysis
    Physique(PhysiqueArgs),
    /// Talk to the assistant; reads stdin lines when no message is given
    Chat(ChatArgs),
}

#[derive(Debug, Args)]
pub struct HabitArgs {
    #[arg(long)]
    pub study: bool,
    #[arg(long)]
    pub project: bool,
    #[arg(long)]
    pub sport: bool,
    #[arg(long)]
    pub social: bool,
    #[arg(long, default_value = "")]
    pub note: String,
}

impl HabitArgs {
    /// Habits marked done on the command line.
    pub fn done(&self) -> Vec<HabitKind> {
        [
            (HabitKind::Study, self.study),
            (HabitKind::Project, self.project),
            (HabitKind::Sport, self.sport),
            (HabitKind::Social, self.social),
        ]
        .into_iter()
        .filter_map(|(kind, done)| done.then_some(kind))
        .collect()
    }
}

/// Measurements are taken as text and coerced, so `--waist ?` sends 0.
#[derive(Debug, Args)]
pub struct PhysiqueArgs {
    /// Weight in kg
    #[arg(long)]
    pub weight: String,
    /// Height in cm
    #[arg(long)]
    pub height: String,
    #[arg(long)]
    pub waist: Option<String>,
    #[arg(long)]
    pub neck: Option<String>,
    #[arg(long)]
    pub hip: Option<String>,
    #[arg(long)]
    pub shoulder: Option<String>,
    #[arg(long)]
    pub chest: Option<String>,
    #[arg(long, default_value = "")]
    pub note: String,
}

impl PhysiqueArgs {
    /// Raw text for every field that was given.
    pub fn fields(&self) -> Vec<(MeasurementField, &str)> {
        [
            (MeasurementField::Weight, Some(&self.weight)),
            (MeasurementField::Height, Some(&self.height)),
            (MeasurementField::Waist, self.waist.as_ref()),
            (MeasurementField::Neck, self.neck.as_ref()),
            (MeasurementField::Hip, self.hip.as_ref()),
            (MeasurementField::Shoulder, self.shoulder.as_ref()),
            (MeasurementField::Chest, self.chest.as_ref()),
        ]
        .into_iter()
        .filter_map(|(field, text)| text.map(|text| (field, text.as_str())))
        .collect()
    }
}

#[derive(Debug, Args)]
pub struct ChatArgs {
    /// Message to send; omit for an interactive session
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn habit_flags_and_global_options() {
        let cli = Cli::try_parse_from([
            "tracklet",
            "habit",
            "--study",
            "--social",
            "--note",
            "ran 5k",
            "--dry-run",
            "--config",
            "a.json5",
            "--config",
            "b.json5",
        ])
        .expect("parse");
        assert!(cli.dry_run);
        assert_eq!(cli.config.len(), 2);
        let Command::Habit(args) = cli.command else {
            panic!("expected habit command");
        };
        assert_eq!(args.done(), vec![HabitKind::Study, HabitKind::Social]);
        assert_eq!(args.note, "ran 5k");
    }

    #[test]
    fn physique_requires_weight_and_height() {
        assert!(Cli::try_parse_from(["tracklet", "physique", "--weight", "70"]).is_err());

        let cli = Cli::try_parse_from([
            "tracklet",
            "physique",
            "--weight",
            "70",
            "--height",
            "175",
            "--waist",
            "?",
        ])
        .expect("parse");
        let Command::Physique(args) = cli.command else {
            panic!("expected physique command");
        };
        assert_eq!(
            args.fields(),
            vec![
                (MeasurementField::Weight, "70"),
                (MeasurementField::Height, "175"),
                (MeasurementField::Waist, "?"),
            ]
        );
    }

    #[test]
    fn chat_message_is_optional() {
        let cli = Cli::try_parse_from(["tracklet", "--test-endpoint", "chat"]).expect("parse");
        assert!(cli.test_endpoint);
        assert!(matches!(cli.command, Command::Chat(ChatArgs { message: None })));
    }
}
