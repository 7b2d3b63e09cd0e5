use crate::application::{Config, PickerApp, Theme};
use crate::entities::Granularity;
use clap::{Args, Parser, Subcommand};
use crossterm::tty::IsTty;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "datepick")]
#[command(about = "A terminal date, month and year picker")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub pick: PickArgs,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the picker and print the chosen value (the default)
    Pick(PickArgs),
    /// Print the canonical form of a value
    Parse {
        raw: String,
        /// Precision: date, month or year
        #[arg(short = 't', long = "type", default_value = "date")]
        granularity: String,
    },
    /// Print the value a picker without a value opens on
    FirstAllowed(PickArgs),
}

/// Picker settings given on the command line. They override the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct PickArgs {
    /// Precision: date, month or year
    #[arg(short = 't', long = "type")]
    pub granularity: Option<String>,

    /// Initially selected value (YYYY, YYYY-MM or YYYY-MM-DD)
    #[arg(long)]
    pub value: Option<String>,

    /// Selectable value; repeat to allow several
    #[arg(short, long = "allowed")]
    pub allowed: Vec<String>,

    #[arg(long)]
    pub min: Option<String>,

    #[arg(long)]
    pub max: Option<String>,

    /// Mouse wheel and PageUp/PageDown move the table
    #[arg(long)]
    pub scrollable: bool,

    /// Close as soon as a value is picked
    #[arg(long)]
    pub autosave: bool,

    /// Table shown first: YEAR, MONTH or DATE
    #[arg(long)]
    pub active_picker: Option<String>,

    /// Color theme: dark, light or minimal
    #[arg(long)]
    pub theme: Option<String>,

    /// Config file (defaults to $DATEPICK_CONFIG, then the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl PickArgs {
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::from_env()?,
        };
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(&self, config: &mut Config) {
        if let Some(granularity) = &self.granularity {
            config.granularity = granularity.clone();
        }
        if self.value.is_some() {
            config.value = self.value.clone();
        }
        if !self.allowed.is_empty() {
            config.allowed_dates = Some(self.allowed.clone());
        }
        if self.min.is_some() {
            config.min = self.min.clone();
        }
        if self.max.is_some() {
            config.max = self.max.clone();
        }
        config.scrollable |= self.scrollable;
        config.autosave |= self.autosave;
        if self.active_picker.is_some() {
            config.active_picker = self.active_picker.clone();
        }
        if let Some(theme) = &self.theme {
            config.theme = theme.clone();
        }
    }
}

impl Cli {
    pub fn run() -> anyhow::Result<()> {
        let cli = Self::parse();

        match cli.command {
            Some(Commands::Pick(args)) => pick(&args)?,
            Some(Commands::Parse { raw, granularity }) => {
                let granularity: Granularity = granularity.parse()?;
                println!("{}", PickerApp::parse(&raw, granularity)?);
            }
            Some(Commands::FirstAllowed(args)) => {
                let app = PickerApp::without_plugins(args.load_config()?);
                println!("{}", app.first_allowed()?);
            }
            None => pick(&cli.pick)?,
        }

        Ok(())
    }
}

fn pick(args: &PickArgs) -> anyhow::Result<()> {
    let app = PickerApp::new(args.load_config()?);

    match app.run_tui()? {
        Some(value) => print_value(&value, &app.theme()),
        None => log::info!("picker cancelled"),
    }
    Ok(())
}

/// Plain output when piped so scripts can read the value.
fn print_value(value: &str, theme: &Theme) {
    if IsTty::is_tty(&std::io::stdout()) {
        println!("{}", theme.colors.accent.colorize(value));
    } else {
        println!("{}", value);
    }
}
