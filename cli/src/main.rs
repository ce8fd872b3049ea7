use std::io::{self, BufRead, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use memorama_core as game;

use game::{CardIdentity, Coord, Coord2, GameConfig, GameOutcome, GameSession, VisibleCell};

#[derive(Parser, Debug)]
#[command(version, about = "Memory-matching game with an instant-loss joker")]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Board preset
    #[arg(short, long, value_enum, default_value_t = Preset::Classic)]
    preset: Preset,

    /// Milliseconds a mismatched pair stays visible
    #[arg(long, default_value_t = game::DEFAULT_HIDE_DELAY_MS)]
    hide_delay_ms: u64,
}

#[derive(Copy, Clone, Debug, PartialEq, clap::ValueEnum)]
enum Preset {
    /// 3x3, 4 pairs
    Mini,
    /// 5x5, 12 pairs
    Classic,
    /// 7x7, 24 pairs
    Large,
}

impl Preset {
    fn config(self) -> GameConfig {
        match self {
            Preset::Mini => GameConfig::mini(),
            Preset::Classic => GameConfig::classic(),
            Preset::Large => GameConfig::large(),
        }
    }
}

fn init_logging(verbose: &clap_verbosity_flag::Verbosity) {
    use tracing_subscriber::filter::LevelFilter;

    let level = match verbose.log_level() {
        None => return,
        Some(log::Level::Error) => LevelFilter::ERROR,
        Some(log::Level::Warn) => LevelFilter::WARN,
        Some(log::Level::Info) => LevelFilter::INFO,
        Some(log::Level::Debug) => LevelFilter::DEBUG,
        Some(log::Level::Trace) => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.verbose);

    let mut config = args.preset.config();
    config.hide_delay_ms = args.hide_delay_ms;

    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {seed}");

    let mut session = GameSession::from_config(config, seed).context("could not deal a board")?;
    let clock = Instant::now();

    println!("Find all {} pairs. Flip the joker and you lose.", session.pair_count());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        session.tick(now_ms(clock));
        render(&session);

        print!("flip (e.g. b3), r = restart, q = quit > ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line.context("reading input")?;
        let input = line.trim();

        match input {
            "" => {}
            "q" | "quit" => break,
            "r" | "restart" => {
                let seed = rand::random();
                log::debug!("restart seed: {seed}");
                session.reset(seed).context("could not redeal the board")?;
            }
            _ => match parse_coords(input) {
                Some(coords) => flip(&mut session, coords, now_ms(clock)),
                None => println!("could not read {input:?} as a cell"),
            },
        }
    }

    Ok(())
}

fn now_ms(clock: Instant) -> game::TimeMs {
    clock.elapsed().as_millis() as game::TimeMs
}

fn flip(session: &mut GameSession, coords: Coord2, now: game::TimeMs) {
    use game::RevealOutcome::*;

    match session.reveal(coords, now) {
        Ok(NoChange) => println!("nothing to flip there"),
        Ok(FirstUp) => {}
        Ok(Matched) => println!("a pair!"),
        Ok(Mismatch) => println!("no match"),
        Ok(HitJoker) => {}
        Ok(Won) => {}
        Err(err) => println!("{err}"),
    }
}

/// Column letter plus 1-based row number, like `b3`.
fn parse_coords(input: &str) -> Option<Coord2> {
    let mut chars = input.chars();
    let column = chars.next()?.to_ascii_lowercase();
    if !column.is_ascii_lowercase() {
        return None;
    }
    let x = (column as u32 - 'a' as u32) as Coord;
    let row: u8 = chars.as_str().parse().ok()?;
    let y = row.checked_sub(1)?;
    Some((x, y))
}

fn render(session: &GameSession) {
    let snapshot = session.snapshot();
    let (width, height) = session.size();

    print!("\n   ");
    for x in 0..width {
        print!(" {} ", (b'a' + x) as char);
    }
    println!();

    for y in 0..height {
        print!("{:>2} ", y + 1);
        for x in 0..width {
            let cell = snapshot.cells[[usize::from(x), usize::from(y)]];
            match cell {
                VisibleCell::Hidden => print!(" . "),
                VisibleCell::Revealed(card) => print!("({})", card_glyph(card)),
                VisibleCell::Matched(card) => print!(" {} ", card_glyph(card)),
            }
        }
        println!();
    }

    println!(
        "moves: {}  pairs: {}/{}",
        snapshot.moves, snapshot.matched_pairs, snapshot.pairs
    );

    match snapshot.outcome {
        GameOutcome::InProgress => {}
        GameOutcome::Won => println!("*** you matched every pair, you win! ***"),
        GameOutcome::Lost => println!("*** the joker! game over. ***"),
    }
}

fn card_glyph(card: CardIdentity) -> char {
    match card {
        CardIdentity::Pair(value) => (b'A' + (value % 26) as u8) as char,
        CardIdentity::Joker => '!',
    }
}
