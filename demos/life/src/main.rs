//! Conway's Game of Life as a Cell-DEVS scenario.
//!
//! Every cell fires once per time unit.  At each instant, outputs carry
//! the cells' current liveness; each cell folds its neighbors' messages
//! into a local view and applies the Life rules.  The cells override the
//! confluent policy to "external first, then internal" so a step's rule
//! application always sees the neighbor states announced at the *same*
//! instant.
//!
//! Usage: `life [width] [height] [steps] [seed]` (defaults: 16 16 30 42).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;

use pdevs_cell::CellScenario;
use pdevs_core::{Bag, PortSpec};
use pdevs_engine::{Runner, SimObserver};
use pdevs_model::AtomicModel;

/// Grid coordinate, printable so it can serve as a cell id.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
struct Pos {
    x: i32,
    y: i32,
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.x, self.y)
    }
}

/// Shared grid snapshot, updated by cells as they transition.
type Board = Arc<Mutex<HashMap<Pos, bool>>>;

// ── Life cell ─────────────────────────────────────────────────────────────────

struct LifeCell {
    pos: Pos,
    alive: bool,
    /// Latest announced state per neighbor.
    neighbors: FxHashMap<Pos, bool>,
    board: Board,
}

impl AtomicModel<f64> for LifeCell {
    fn input_ports(&self) -> Vec<PortSpec> {
        vec![PortSpec::of::<(Pos, bool)>("neighborhood")]
    }

    fn output_ports(&self) -> Vec<PortSpec> {
        vec![PortSpec::of::<(Pos, bool)>("state")]
    }

    fn time_advance(&self) -> f64 {
        1.0
    }

    fn internal_transition(&mut self) {
        let alive_neighbors = self.neighbors.values().filter(|&&a| a).count();
        self.alive = matches!((self.alive, alive_neighbors), (true, 2) | (_, 3));
        self.board.lock().unwrap().insert(self.pos, self.alive);
    }

    fn external_transition(&mut self, _elapsed: f64, inputs: &Bag) {
        for &(pos, alive) in inputs.values::<(Pos, bool)>("neighborhood") {
            self.neighbors.insert(pos, alive);
        }
    }

    /// External first: the rule application in `internal_transition` must
    /// see the neighbor states announced at this same instant.
    fn confluent_transition(&mut self, inputs: &Bag) {
        self.external_transition(0.0, inputs);
        self.internal_transition();
    }

    fn output(&self) -> Bag {
        let mut bag = Bag::new();
        bag.push("state", (self.pos, self.alive));
        bag
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

struct ProgressPrinter;

impl SimObserver<f64> for ProgressPrinter {
    fn on_run_start(&mut self, time: f64) {
        println!("run start at t={time}");
    }

    fn on_advance(&mut self, _model: &str, _from: f64, to: f64) {
        println!("  step -> t={to}");
    }

    fn on_run_end(&mut self, time: f64) {
        println!("run end at t={time}");
    }
}

// ── Assembly ──────────────────────────────────────────────────────────────────

/// Moore neighborhood on a torus.
fn neighborhood(pos: Pos, width: i32, height: i32) -> Vec<Pos> {
    let mut out = Vec::with_capacity(8);
    for dx in -1..=1 {
        for dy in -1..=1 {
            if (dx, dy) == (0, 0) {
                continue;
            }
            out.push(Pos {
                x: (pos.x + dx).rem_euclid(width),
                y: (pos.y + dy).rem_euclid(height),
            });
        }
    }
    out
}

fn print_board(board: &HashMap<Pos, bool>, width: i32, height: i32) {
    for y in 0..height {
        let row: String = (0..width)
            .map(|x| if board[&Pos { x, y }] { '#' } else { '.' })
            .collect();
        println!("{row}");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let width: i32 = args.next().map_or(Ok(16), |a| a.parse())?;
    let height: i32 = args.next().map_or(Ok(16), |a| a.parse())?;
    let steps: u64 = args.next().map_or(Ok(30), |a| a.parse())?;
    let seed: u64 = args.next().map_or(Ok(42), |a| a.parse())?;

    let mut rng = SmallRng::seed_from_u64(seed);
    let board: Board = Board::default();

    let board_for_cells = board.clone();
    let mut grid: CellScenario<f64, Pos, bool, ()> =
        CellScenario::new("life", move |&pos, alive, _vicinity| {
            Box::new(LifeCell {
                pos,
                alive,
                neighbors: FxHashMap::default(),
                board: board_for_cells.clone(),
            })
        });

    for x in 0..width {
        for y in 0..height {
            let pos = Pos { x, y };
            let alive = rng.gen_bool(0.35);
            board.lock().unwrap().insert(pos, alive);
            grid.add_cell_with_neighbors(pos, alive, &neighborhood(pos, width, height))?;
        }
    }

    println!("initial board ({width}x{height}, seed {seed}):");
    print_board(&board.lock().unwrap(), width, height);

    let mut runner = Runner::new(grid.couple_cells()?.build(), ProgressPrinter);
    let reached = runner.run_until(steps as f64)?;

    println!("final board at t={reached}:");
    print_board(&board.lock().unwrap(), width, height);
    Ok(())
}
