//! Command-line front end: generate a level from a JSON description and
//! print it as ASCII.

use std::collections::HashSet;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::{error, info, warn};

use graph_dungeon::{
    generate_level, Cell, GenRng, GeneratedLevel, LevelFile, Path, PlacementStrategy, TemplateCell,
};

/// Generate a dungeon level from a room graph
#[derive(Parser, Debug)]
#[command(name = "graph-dungeon")]
#[command(version, about, long_about = None)]
struct Args {
    /// Level description (JSON)
    level: PathBuf,

    /// Seed for a reproducible level; random if omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the placement strategy from the level file
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Print the level as ASCII
    #[arg(long)]
    map: bool,

    /// Path from the entrance to the farthest room (drawn with --map)
    #[arg(long)]
    path: bool,

    /// Log at trace level
    #[arg(short, long)]
    verbose: bool,

    /// Record puffin scopes and report the frame
    #[arg(long)]
    profile: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    GraphBudget,
    Area,
}

impl From<StrategyArg> for PlacementStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::GraphBudget => PlacementStrategy::GraphBudget,
            StrategyArg::Area => PlacementStrategy::Area,
        }
    }
}

fn init_logging(verbose: bool) {
    use simplelog::LevelFilter::{Debug, Off, Trace};
    let result = simplelog::WriteLogger::init(
        if verbose { Trace } else { Debug },
        simplelog::ConfigBuilder::new()
            .set_target_level(Off)
            .set_location_level(Off)
            .set_time_level(Off)
            .build(),
        std::io::stderr(),
    );
    if let Err(e) = result {
        eprintln!("could not initialize logging: {e}");
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);
    puffin::set_scopes_on(args.profile);
    let frames = args.profile.then(puffin::GlobalFrameView::default);

    let mut level = match LevelFile::load(&args.level) {
        Ok(level) => level,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(strategy) = args.strategy {
        level.config.layout.strategy = strategy.into();
    }

    let mut rng = match args.seed {
        Some(seed) => GenRng::new(seed),
        None => GenRng::from_entropy(),
    };
    info!("seed {}", rng.seed());

    let generated = match generate_level(
        &level.graph,
        &level.rules,
        &level.catalog,
        &level.config,
        &mut rng,
    ) {
        Ok(generated) => generated,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let path = if args.path {
        let path = longest_entrance_path(&generated, &level);
        match &path {
            Some(p) => info!("path to farthest room: {} steps, cost {}", p.len(), p.cost),
            None => warn!("no path from the entrance to any other room"),
        }
        path
    } else {
        None
    };

    if args.map {
        println!("{}", render_map(&generated, path.as_ref()));
    }

    if let Some(frames) = frames {
        puffin::GlobalProfiler::lock().new_frame();
        if let Some(frame) = frames.lock().latest_frame() {
            let meta = frame.meta();
            info!(
                "profiled {} scopes over {:.2} ms",
                meta.num_scopes,
                (meta.range_ns.1 - meta.range_ns.0) as f64 / 1e6
            );
        }
    }

    ExitCode::SUCCESS
}

/// Path from the entrance to whichever room is the most expensive to reach
fn longest_entrance_path(generated: &GeneratedLevel, level: &LevelFile) -> Option<Path> {
    let entrance = generated.graph.entrance().ok()?;
    let start = generated.room_center(entrance)?;
    let mut pathfinder = generated.pathfinder(&level.config);
    generated
        .layout
        .rooms
        .iter()
        .filter(|room| room.id != entrance)
        .filter_map(|room| pathfinder.find_path(&generated.grid, start, room.central_floor()?))
        .max_by_key(|path| path.cost)
}

/// `#` wall, `.` floor, `o` prop, `+` door, `,` corridor, `*` path
fn render_map(generated: &GeneratedLevel, path: Option<&Path>) -> String {
    let on_path: HashSet<Cell> = path
        .map(|p| p.cells.iter().copied().collect())
        .unwrap_or_default();
    let layout = &generated.layout;
    let bounds = generated.grid.bounds();

    let mut out = String::new();
    for y in bounds.y..bounds.bottom() {
        for x in bounds.x..bounds.right() {
            let cell = (x, y);
            let room = layout.rooms.iter().find(|r| r.occupies(cell));
            let ch = if on_path.contains(&cell) {
                '*'
            } else if let Some(room) = room {
                if room.is_door(cell) {
                    '+'
                } else {
                    match room.cell_kind(cell) {
                        TemplateCell::Wall => '#',
                        TemplateCell::Floor => '.',
                        TemplateCell::Prop => 'o',
                        TemplateCell::Void => ' ',
                    }
                }
            } else if layout.corridor_cells().contains(&cell) {
                ','
            } else {
                ' '
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}
