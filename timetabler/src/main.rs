use std::fs;
use std::path::PathBuf;

use clap::Parser;

use maxsat::CadicalSolver;
use timetabler::{SolveOutcome, TimeTabler};

/// Compiles timetable scheduling rules into a weighted CNF formula and
/// solves it with a MaxSAT search
#[derive(Parser)]
#[command(name = "timetabler")]
struct Args {
    /// Fields descriptor: slots, classrooms, instructors, segments,
    /// programs, minor labels and rule weights
    fields: PathBuf,

    /// Courses table, one course record per line
    courses: PathBuf,

    /// Optional custom-constraint file
    #[arg(short, long)]
    custom: Option<PathBuf>,
}

fn read(path: &PathBuf) -> Result<String, i32> {
    fs::read_to_string(path).map_err(|error| {
        eprintln!("cannot read {}: {}", path.display(), error);
        1
    })
}

fn run(args: &Args) -> Result<i32, i32> {
    let fields_text = read(&args.fields)?;
    let courses_text = read(&args.courses)?;

    let (data, weights) = timetabler::load(&fields_text, &courses_text).map_err(|error| {
        eprintln!("{}: {}", args.fields.display(), error);
        1
    })?;

    let mut tabler = TimeTabler::new(data, CadicalSolver::new());
    tabler.compile(&weights);

    if let Some(path) = &args.custom {
        let custom_text = read(path)?;
        let submitted = tabler.add_custom(&custom_text).map_err(|error| {
            eprintln!("{}: {}", path.display(), error);
            1
        })?;
        log::info!("added {} custom constraints", submitted);
    }

    match tabler.solve() {
        SolveOutcome::Solved { timetable, cost } => {
            print!("{}", timetable);
            println!("total penalty: {}", cost);
            Ok(0)
        }
        SolveOutcome::Infeasible => {
            eprintln!("the hard constraints are unsatisfiable");
            Ok(2)
        }
        SolveOutcome::Unknown => {
            eprintln!("the solver gave up before reaching a verdict");
            Ok(2)
        }
    }
}

fn main() {
    #[cfg(feature = "logging")]
    match log4rs::init_file("config/log4rs.yaml", Default::default()) {
        Ok(()) => log::trace!("logging configured"),
        Err(error) => eprintln!("logging disabled: {}", error),
    }

    let args = Args::parse();
    let code = run(&args).unwrap_or_else(|code| code);
    std::process::exit(code);
}
