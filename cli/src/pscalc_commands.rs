use clap::{value_parser, Arg, ArgAction, Command};

fn verbose() -> Arg {
    Arg::new("verbose")
        .short('v')
        .action(ArgAction::Count)
        .help("Debug mode")
}

fn scenario_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("lambda")
                .short('l')
                .long("lambda")
                .value_name("COPY_NUM")
                .value_parser(value_parser!(f64))
                .default_value("30")
                .help("Minimum copy number per species (lambda)."),
        )
        .arg(
            Arg::new("sample_size")
                .short('s')
                .long("sample_size")
                .value_parser(value_parser!(u64).range(1..))
                .default_value("8000")
                .help("Phage (draws) per sample."),
        )
        .arg(
            Arg::new("species")
                .short('n')
                .long("species")
                .value_parser(value_parser!(u64).range(1..))
                .default_value("350000")
                .help("Total number of species."),
        )
        .arg(
            Arg::new("mean_copies")
                .short('m')
                .long("mean_copies")
                .value_parser(value_parser!(u64).range(1..))
                .default_value("30")
                .help("Mean copies per species."),
        )
        .arg(
            Arg::new("confidence")
                .short('c')
                .long("confidence")
                .value_parser(value_parser!(f64))
                .default_value("0.95")
                .help("Probability to capture a species with [lambda] copies. In (0,1)."),
        )
}

fn output_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("PATH")
                .help("Output file. Standard output if not given."),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_parser(["tsv", "json"])
                .default_value("tsv")
                .help("Output format of the curve."),
        )
}

fn subcommand_required() -> Command {
    let command = Command::new("required")
        .version("0.1")
        .author("Bansho Masutani")
        .about("Number of samples needed to capture species with [lambda] or more copies.")
        .arg(verbose());
    scenario_args(command)
}

fn subcommand_capture() -> Command {
    let command = Command::new("capture")
        .version("0.1")
        .author("Bansho Masutani")
        .about("Probability(%) to capture a species with [copy_number] copies in [samples] samples.")
        .arg(verbose())
        .arg(
            Arg::new("copy_number")
                .short('k')
                .long("copy_number")
                .value_parser(value_parser!(f64))
                .required(true)
                .help("Copy number of the species."),
        )
        .arg(
            Arg::new("samples")
                .long("samples")
                .value_parser(value_parser!(u64).range(1..))
                .required(true)
                .help("Number of samples."),
        );
    scenario_args(command)
}

fn subcommand_curve() -> Command {
    let command = Command::new("curve")
        .version("0.1")
        .author("Bansho Masutani")
        .about("Detection probability for copy numbers from 1 to 2*[lambda].")
        .arg(verbose())
        .arg(
            Arg::new("samples")
                .long("samples")
                .value_parser(value_parser!(u64).range(1..))
                .help("Number of samples. Solved from the other parameters if not given."),
        );
    output_args(scenario_args(command))
}

fn subcommand_report() -> Command {
    let command = Command::new("report")
        .version("0.1")
        .author("Bansho Masutani")
        .about("Solve the number of samples, then write the whole result in JSON.")
        .arg(verbose())
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("PATH")
                .help("Output JSON file. Standard output if not given."),
        );
    scenario_args(command)
}

fn subcommand_profile() -> Command {
    Command::new("profile")
        .version("0.1")
        .author("Bansho Masutani")
        .about("Run the calculation configured by a TOML file.")
        .arg(
            Arg::new("profile")
                .required_unless_present("template")
                .value_name("TOML")
                .help("TOML setting file."),
        )
        .arg(
            Arg::new("template")
                .long("template")
                .action(ArgAction::SetTrue)
                .help("Print a profile with the default values and exit."),
        )
}

pub fn pscalc_parser() -> Command {
    Command::new("pscalc")
        .version("0.1")
        .author("Bansho Masutani <ban-m@g.ecc.u-tokyo.ac.jp>")
        .about("Poisson sample size calculator")
        .arg_required_else_help(true)
        .subcommand(subcommand_required())
        .subcommand(subcommand_capture())
        .subcommand(subcommand_curve())
        .subcommand(subcommand_report())
        .subcommand(subcommand_profile())
}
