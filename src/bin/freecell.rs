use std::error::Error;
use std::io::{self, BufRead, Write};
use std::process;

use clap::{ArgAction, Parser, ValueEnum};
use log::{LevelFilter, Log, Metadata, Record, error};

use freecell::{
    Board, DEFAULT_SEED, GameError, SupermoveRule, VisualOptions, describe_move,
    render_board_with_options,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RuleArg {
    /// Any in-sequence run may move
    Unrestricted,
    /// Cap runs by free cells and empty columns
    Capacity,
}

impl From<RuleArg> for SupermoveRule {
    fn from(rule: RuleArg) -> Self {
        match rule {
            RuleArg::Unrestricted => SupermoveRule::Unrestricted,
            RuleArg::Capacity => SupermoveRule::FreeCellCapacity,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "freecell", about = "Play Freecell in the terminal using move strings.")]
struct Args {
    /// Seed for the shuffle
    #[arg(short = 's', long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Disable ANSI colours
    #[arg(long = "no-color", action = ArgAction::SetTrue)]
    no_color: bool,

    /// Supermove size rule
    #[arg(long = "rule", value_enum, default_value_t = RuleArg::Unrestricted)]
    rule: RuleArg,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn main() {
    let args = Args::parse();
    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
    if let Err(err) = run(&args) {
        error!("{err}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let options = VisualOptions { color: !args.no_color };
    let mut seed = args.seed;
    let mut board = new_board(seed, args.rule)?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        println!("{}", render_board_with_options(&board.view(), options));
        print!("Move (e.g. T3;F1, T3,2;T5, F2;DH), 'help', 'new' or 'q': ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            return Ok(());
        };
        let input = line?;
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("q") || trimmed.eq_ignore_ascii_case("quit") {
            println!("Goodbye.");
            return Ok(());
        }
        if trimmed.eq_ignore_ascii_case("help") {
            print_help();
            continue;
        }
        if trimmed.eq_ignore_ascii_case("new") {
            seed = seed.wrapping_add(1);
            board = new_board(seed, args.rule)?;
            println!("Dealt a new game (seed {seed}).");
            continue;
        }

        match board.check(trimmed) {
            Ok(command) => {
                let description = describe_move(&board.view(), &command);
                board.apply(command)?;
                println!("{description}");
            }
            Err(err) => println!("Illegal move: {err}"),
        }
    }
}

fn new_board(seed: u64, rule: RuleArg) -> Result<Board, GameError> {
    Board::builder()
        .with_seed(seed)
        .with_supermove_rule(rule.into())
        .build()
}

fn print_help() {
    println!("Moves are written <source>;<destination>:");
    println!("  T<n>        tableau column n (1-8)");
    println!("  F<n>        freecell n (1-4)");
    println!("  D<suit>     foundation, suit H, D, S or C (or the full name)");
    println!("  T<n>,<k>    the top k cards of column n, as a run (tableau to tableau only)");
    println!("Examples: T3;F1  T3,4;T5  F2;DH");
}
