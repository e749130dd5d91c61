//! # Auto-Play Runner
//!
//! Pits two seats (the MCTS engine and/or the random baseline) against
//! each other for full games of five-in-a-row, printing boards and a final
//! tally. The default matchup is engine (black) versus random (white), which
//! doubles as a quick sanity check of the search: the engine side should win
//! nearly every game.
//!
//! Run with `cargo run --release` for best performance.

use clap::{Parser, ValueEnum};
use colored::Colorize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gomoku::{
    Board, Mcts, Outcome, Player, Ply, RandomPolicy, SearchConfig, SearchError, DEFAULT_BUDGET,
};

/// Who controls a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Agent {
    /// The UCT search engine
    Mcts,
    /// The uniformly-random baseline
    Random,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: u32,

    /// Search iterations per engine decision
    #[arg(long, default_value_t = DEFAULT_BUDGET)]
    budget: u32,

    /// Agent for the black seat (moves first)
    #[arg(long, value_enum, default_value = "mcts")]
    black: Agent,

    /// Agent for the white seat
    #[arg(long, value_enum, default_value = "random")]
    white: Agent,

    /// Seed for every random source (omit for entropy)
    #[arg(long)]
    seed: Option<u64>,

    /// Independent rollouts per selected leaf; values above 1 run on a
    /// thread pool
    #[arg(long, default_value_t = 1)]
    rollouts_per_leaf: usize,

    /// Print the board after every move
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    show_boards: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Plays one game to completion and returns its outcome.
fn play_game(
    args: &Args,
    engine: &mut Mcts,
    random: &mut RandomPolicy,
) -> Result<Outcome, SearchError> {
    let mut board = Board::new();
    let mut player = Player::Black;
    loop {
        let agent = match player {
            Player::Black => args.black,
            Player::White => args.white,
        };
        let (mv, outcome) = match agent {
            Agent::Mcts => {
                let mv = engine.uct_search(&board, player)?;
                board.place(mv, player)?;
                let outcome = match board.check_win(mv.0, mv.1) {
                    Some(winner) => Some(Outcome::Win(winner)),
                    None if board.candidate_moves().is_empty() => Some(Outcome::Draw),
                    None => None,
                };
                (Some(mv), outcome)
            }
            Agent::Random => match random.make_move(&mut board, player)? {
                Ply::Exhausted => (None, Some(Outcome::Draw)),
                Ply::Played { mv, outcome } => (Some(mv), outcome),
            },
        };
        if args.show_boards {
            if let Some(mv) = mv {
                println!("{} plays {}", player, mv);
            }
            println!("{board}");
        }
        if let Some(outcome) = outcome {
            return Ok(outcome);
        }
        player = player.opponent();
    }
}

fn main() -> Result<(), SearchError> {
    init_tracing();
    let args = Args::parse();

    let config = SearchConfig::default()
        .with_iterations(args.budget)
        .with_rollouts_per_leaf(args.rollouts_per_leaf);
    let config = match args.seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    };
    let mut engine = Mcts::new(config);
    // Offset the opponent seed so the two sources never share a stream.
    let mut random = RandomPolicy::new(args.seed.map(|s| s.wrapping_add(1)));

    info!(games = args.games, budget = args.budget, black = ?args.black, white = ?args.white, "starting match");

    let mut black_wins = 0u32;
    let mut white_wins = 0u32;
    let mut draws = 0u32;
    for game in 1..=args.games {
        let outcome = play_game(&args, &mut engine, &mut random)?;
        match outcome {
            Outcome::Win(Player::Black) => {
                black_wins += 1;
                println!("game {:>3}: {}", game, "black (X) wins".green());
            }
            Outcome::Win(Player::White) => {
                white_wins += 1;
                println!("game {:>3}: {}", game, "white (O) wins".red());
            }
            Outcome::Draw => {
                draws += 1;
                println!("game {:>3}: {}", game, "draw".yellow());
            }
        }
    }

    println!(
        "\n{}: black {} / white {} / drawn {}",
        "final tally".bold(),
        black_wins,
        white_wins,
        draws
    );
    Ok(())
}
