use docopt::Docopt;
use error_chain::quick_main;
use log::{debug, info};
use mazegen::{
    cells::WorldPosition,
    generators::RecursiveBacktracker,
    grid::{CellLayout, Grid},
    grid_displays::{MazeText, PlainDisplay, RunOverlay},
    passages,
    units::{CellSize, Height, Width},
};
use serde_derive::Deserialize;
use std::{
    fs::File,
    io,
    io::prelude::*,
    thread,
    time::Duration,
};

const USAGE: &str = "Mazegen

Usage:
    mazegen_driver -h | --help
    mazegen_driver [--width=<w>] [--height=<h>] [--seed=<s>] [--cell-size=<c>] [--text-out=<path>]
    mazegen_driver animate [--width=<w>] [--height=<h>] [--seed=<s>] [--cell-size=<c>] [--delay-ms=<ms>] [--show-visited] [--show-frontier]

Options:
    -h --help            Show this screen.
    --width=<w>          Grid width in cells [default: 10].
    --height=<h>         Grid height in cells [default: 10].
    --seed=<s>           Seed for the random neighbour choice; the same seed gives the same maze [default: 0].
    --cell-size=<c>      World space length of one cell side, layout only [default: 1.0].
    --text-out=<path>    Write the finished maze to a text file instead of the terminal.
    --delay-ms=<ms>      Pause between animation steps in milliseconds [default: 50].
    --show-visited       Mark visited cells while animating.
    --show-frontier      Mark the frontier cell while animating.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    cmd_animate: bool,
    flag_width: i32,
    flag_height: i32,
    flag_seed: u64,
    flag_cell_size: f32,
    flag_text_out: String,
    flag_delay_ms: u64,
    flag_show_visited: bool,
    flag_show_frontier: bool,
}

mod errors {
    use error_chain::*;
    error_chain! {

        links {
            Maze(::mazegen::errors::Error, ::mazegen::errors::ErrorKind);
        }

        foreign_links {
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

quick_main!(run);

fn run() -> Result<()> {
    env_logger::init();

    let args: MazeArgs = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());
    debug!("{:?}", args);

    let grid = grid_from_args(&args)?;
    let mut generator = RecursiveBacktracker::new(grid);
    generator.generate(args.flag_seed);

    if args.cmd_animate {
        animate(&mut generator, &args)?;
    } else {
        let steps = generator.run_to_completion();
        info!("Generated in {} steps", steps);

        let maze_text = MazeText::new(generator.grid(), &PlainDisplay).to_string();
        if args.flag_text_out.is_empty() {
            print!("{}", maze_text);
        } else {
            write_text_to_file(&maze_text, &args.flag_text_out)
                .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
        }
    }

    let grid = generator.grid();
    debug!("Perfect maze: {}, dead ends: {}",
           passages::is_perfect_maze(grid),
           passages::dead_ends_count(grid));

    Ok(())
}

/// Reject malformed configuration before any generation starts.
fn grid_from_args(args: &MazeArgs) -> Result<Grid> {
    let layout = CellLayout::new(WorldPosition::default(), CellSize(args.flag_cell_size))
        .chain_err(|| "Invalid --cell-size")?;
    let grid = Grid::with_layout(Width(args.flag_width), Height(args.flag_height), layout)
        .chain_err(|| "Invalid --width/--height")?;
    Ok(grid)
}

/// Pull steps one at a time, redrawing the maze after each and pausing in between.
fn animate(generator: &mut RecursiveBacktracker, args: &MazeArgs) -> Result<()> {
    let delay = Duration::from_millis(args.flag_delay_ms);
    let stdout = io::stdout();

    while let Some(step) = generator.step() {
        let overlay = RunOverlay::new(generator, args.flag_show_visited, args.flag_show_frontier);
        let frame = MazeText::new(generator.grid(), &overlay);

        let mut out = stdout.lock();
        // clear the terminal and home the cursor
        write!(out, "\x1B[2J\x1B[H")?;
        writeln!(out, "step {}: {:?}", generator.steps_taken(), step)?;
        write!(out, "{}", frame)?;
        out.flush()?;

        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }

    Ok(())
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}
