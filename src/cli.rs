use clap::{ArgAction, ArgGroup, Parser};

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "runtests",
    about = "Run the portage unit tests with every supported Python",
    version
)]
#[command(group(ArgGroup::new("verbosity_switch").args(["verbosity", "verbose", "quiet"]).multiple(false)))]
pub struct Cli {
    /// Do not delete the temporary directory when exiting.
    #[arg(long = "keep-temp")]
    pub keep_temp: bool,

    /// Control color output (yes|no|true|false|y|n). Defaults to the NOCOLOR environment toggle.
    #[arg(long, value_name = "WHEN")]
    pub color: Option<String>,

    /// Python versions to test (space separated, may be repeated).
    ///
    /// The keyword "supported" expands to every version that must pass.
    /// Without this flag all known versions are tried and missing interpreters are skipped.
    #[arg(long = "python-versions", value_name = "VERSIONS", action = ArgAction::Append)]
    pub python_versions: Vec<String>,

    /// Set verbosity level.
    #[arg(long, value_name = "LEVEL", allow_negative_numbers = true)]
    pub verbosity: Option<i32>,

    /// Increase verbosity level by 1 per occurrence.
    #[arg(short = 'v', action = ArgAction::Count)]
    pub verbose: u8,

    /// Decrease verbosity level by 1 per occurrence.
    #[arg(short = 'q', action = ArgAction::Count)]
    pub quiet: u8,

    /// Arguments passed through verbatim to the test entry point.
    #[arg(value_name = "ARGS", num_args = 1.., trailing_var_arg = true)]
    pub args: Vec<String>,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Effective output level: `--verbosity` if given, otherwise 1 adjusted by `-v`/`-q`.
    pub fn verbosity_level(&self) -> i32 {
        match self.verbosity {
            Some(level) => level,
            None => 1 + i32::from(self.verbose) - i32::from(self.quiet),
        }
    }
}
