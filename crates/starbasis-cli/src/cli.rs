use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "starbasis - Symmetry-adapted Fourier bases for periodic polymer field theory: star tables, field conversion and comparison.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a summary of the basis built for a domain.
    Info(DomainArgs),
    /// Write the star list of a basis as CSV.
    Stars(TableArgs),
    /// Write the wave list of a basis as CSV.
    Waves(TableArgs),
    /// Convert a field file between symmetry-adapted and k-grid formats.
    Convert(ConvertArgs),
    /// Compare two field files of the same format.
    Compare(CompareArgs),
    /// List the built-in space groups of a dimension.
    Groups {
        /// Spatial dimension (1, 2 or 3).
        #[arg(value_parser = clap::value_parser!(u8).range(1..=3))]
        dimension: u8,
    },
}

/// Description of the periodic domain. Values given here override the
/// configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct DomainArgs {
    /// Path to a domain description in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Mesh dimensions, comma separated (e.g., 32,32,32).
    #[arg(short, long, value_delimiter = ',', value_name = "N1,N2,..")]
    pub mesh: Option<Vec<usize>>,

    /// Crystal system (e.g., cubic, hexagonal, lamellar).
    #[arg(short, long, value_name = "NAME")]
    pub lattice: Option<String>,

    /// Unit cell parameters, comma separated. Angles are in radians.
    #[arg(long = "cell-param", value_delimiter = ',', value_name = "A,B,..")]
    pub cell_parameters: Option<Vec<f64>>,

    /// Space group name, spaces or underscores between symbols (e.g., I_a_-3_d).
    #[arg(short, long, value_name = "NAME", allow_hyphen_values = true)]
    pub group: Option<String>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S basis.symmetry-tolerance=1e-6
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

#[derive(Args, Debug)]
pub struct TableArgs {
    #[command(flatten)]
    pub domain: DomainArgs,

    /// Output CSV file. Writes to standard output if omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    /// Symmetry-adapted coefficients, one line per basis function.
    Basis,
    /// Half-complex discrete Fourier transform on the mesh.
    Kgrid,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub domain: DomainArgs,

    /// Path to the input field file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the converted field file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Format to convert to. The input is read in the other format.
    #[arg(long, value_enum)]
    pub to: FieldFormat,

    /// Project k-grid input onto the symmetric subspace instead of rejecting
    /// fields that break the space-group symmetry.
    #[arg(long)]
    pub project: bool,
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    #[command(flatten)]
    pub domain: DomainArgs,

    /// Format of both files.
    #[arg(long, value_enum, default_value = "basis")]
    pub format: FieldFormat,

    /// Fail if the maximum difference exceeds this value.
    #[arg(short, long, value_name = "FLOAT")]
    pub tolerance: Option<f64>,

    #[arg(required = true, value_name = "LEFT")]
    pub left: PathBuf,

    #[arg(required = true, value_name = "RIGHT")]
    pub right: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_options_accept_lists_and_negative_group_symbols() {
        let cli = Cli::try_parse_from([
            "starbasis",
            "stars",
            "--mesh",
            "16,16,16",
            "--lattice",
            "cubic",
            "--cell-param",
            "3.5",
            "--group",
            "I_a_-3_d",
            "-o",
            "stars.csv",
        ])
        .unwrap();
        let Commands::Stars(args) = cli.command else {
            panic!("expected the stars command");
        };
        assert_eq!(args.domain.mesh, Some(vec![16, 16, 16]));
        assert_eq!(args.domain.cell_parameters, Some(vec![3.5]));
        assert_eq!(args.domain.group.as_deref(), Some("I_a_-3_d"));
        assert_eq!(args.output, Some(PathBuf::from("stars.csv")));
    }

    #[test]
    fn convert_requires_a_target_format() {
        let result = Cli::try_parse_from(["starbasis", "convert", "-i", "a.bf", "-o", "a.kf"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from([
            "starbasis", "convert", "-i", "a.kf", "-o", "a.bf", "--to", "basis", "--project",
        ])
        .unwrap();
        let Commands::Convert(args) = cli.command else {
            panic!("expected the convert command");
        };
        assert_eq!(args.to, FieldFormat::Basis);
        assert!(args.project);
    }

    #[test]
    fn groups_rejects_unsupported_dimensions() {
        assert!(Cli::try_parse_from(["starbasis", "groups", "4"]).is_err());
        assert!(Cli::try_parse_from(["starbasis", "groups", "2"]).is_ok());
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from(["starbasis", "groups", "3", "-vv", "-j", "2"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.threads, Some(2));
    }
}
