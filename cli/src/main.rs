//! Terminal front end for the board engine: argument/config parsing, a
//! read-eval loop over player commands, and text rendering of the grid.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use sapper_core::{
    CellView, FlagOutcome, GameConfig, GameResult, GameSession, RevealOutcome, ScoreBoard,
    format_time,
};

#[derive(Parser, Debug)]
#[command(name = "sapper", about = "Minesweeper in the terminal")]
struct Cli {
    #[arg(long, default_value_t = 16)]
    rows: u16,
    #[arg(long, default_value_t = 25)]
    cols: u16,
    #[arg(long, default_value_t = 50)]
    mines: u32,
    /// Board config file in `cols rows mines` format; overrides the flags
    /// above.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Player name (alphabetic, at most 10 characters). Prompted when
    /// omitted.
    #[arg(long)]
    name: Option<String>,
    #[arg(long, default_value = "leaderboard.txt")]
    scores: PathBuf,
    /// Fixed mine-placement seed, for reproducible boards.
    #[arg(long)]
    seed: Option<u64>,
    #[command(flatten)]
    verbosity: clap_verbosity_flag::Verbosity,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbosity.log_level_filter())
        .init();

    let config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("unable to open config file {}", path.display()))?;
            parse_board_config(&text)?
        }
        None => GameConfig::new(cli.rows, cli.cols, cli.mines)?,
    };

    let player = match cli.name {
        Some(name) => normalize_name(&name)?,
        None => prompt_name()?,
    };

    let seed = cli.seed.unwrap_or_else(rand::random);
    log::debug!(
        "starting {}x{} board with {} mines, seed {seed}",
        config.rows,
        config.cols,
        config.mines
    );
    let mut session = GameSession::new(config, player, seed)?;
    let mut scores = ScoreBoard::load(&cli.scores);
    let mut submitted = false;

    println!("commands: r ROW COL, f ROW COL, p (pause), peek, new, top, q");
    let stdin = io::stdin();
    loop {
        print_board(&session);
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match run_command(&mut session, &mut scores, &mut submitted, line.trim()) {
            Ok(true) => break,
            Ok(false) => {}
            Err(err) => println!("{err}"),
        }
    }

    Ok(())
}

/// Returns `Ok(true)` when the player quits.
fn run_command(
    session: &mut GameSession,
    scores: &mut ScoreBoard,
    submitted: &mut bool,
    line: &str,
) -> Result<bool> {
    let mut parts = line.split_whitespace();
    match parts.next() {
        Some("r") => {
            let pos = parse_pos(&mut parts)?;
            if session.reveal(pos)? == RevealOutcome::NoChange {
                println!("nothing to reveal there");
            }
            announce_result(session, scores, submitted);
        }
        Some("f") => {
            if session.toggle_flag(parse_pos(&mut parts)?)? == FlagOutcome::NoChange {
                println!("cannot flag a revealed cell");
            }
        }
        Some("p") => session.toggle_pause()?,
        Some("peek") => {
            // cheat view; hidden while paused like everything else
            if session.state().is_paused() {
                println!("unpause first");
            } else {
                let mines: Vec<_> = session.board().mine_positions().collect();
                println!("mines: {mines:?}");
            }
        }
        Some("new") => {
            session.reset(rand::random())?;
            *submitted = false;
        }
        Some("top") => print_scores(scores, None),
        Some("q") => return Ok(true),
        Some(other) => println!("unknown command: {other}"),
        None => {}
    }
    Ok(false)
}

fn announce_result(session: &GameSession, scores: &mut ScoreBoard, submitted: &mut bool) {
    match session.result() {
        Some(GameResult::Won) => {
            println!("You Win!");
            if let Some((name, seconds)) = session.score_entry()
                && !*submitted
            {
                let name = name.to_owned();
                scores.submit(name.as_str(), seconds);
                *submitted = true;
                print_scores(scores, Some((name.as_str(), seconds)));
            }
        }
        Some(GameResult::Lost) => println!("Boom! Game over."),
        None => {}
    }
}

fn parse_pos(parts: &mut std::str::SplitWhitespace<'_>) -> Result<(u16, u16)> {
    let row = parts.next().context("expected: ROW COL")?.parse()?;
    let col = parts.next().context("expected: ROW COL")?.parse()?;
    Ok((row, col))
}

/// Classic `cols rows mines` whitespace-separated config format.
fn parse_board_config(text: &str) -> Result<GameConfig> {
    let mut fields = text.split_whitespace();
    let mut next = |what: &str| {
        fields
            .next()
            .with_context(|| format!("config file missing {what}"))
    };
    let cols: u16 = next("column count")?.parse()?;
    let rows: u16 = next("row count")?.parse()?;
    let mines: u32 = next("mine count")?.parse()?;
    Ok(GameConfig::new(rows, cols, mines)?)
}

/// Alphabetic characters only, at most 10 of them, first letter upper-cased
/// and the rest lowered.
fn normalize_name(raw: &str) -> Result<String> {
    let mut name = String::new();
    for c in raw.chars().filter(|c| c.is_ascii_alphabetic()).take(10) {
        if name.is_empty() {
            name.extend(c.to_uppercase());
        } else {
            name.extend(c.to_lowercase());
        }
    }
    if name.is_empty() {
        bail!("player name needs at least one letter");
    }
    Ok(name)
}

fn prompt_name() -> Result<String> {
    let stdin = io::stdin();
    loop {
        print!("Enter your name: ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            bail!("no player name given");
        }
        match normalize_name(line.trim()) {
            Ok(name) => return Ok(name),
            Err(err) => println!("{err}"),
        }
    }
}

fn cell_char(cell: CellView) -> char {
    match cell {
        CellView::Hidden => '.',
        CellView::Flagged => 'F',
        CellView::Revealed(0) => ' ',
        CellView::Revealed(n) => char::from_digit(n.into(), 10).unwrap_or('?'),
        CellView::Mine => '*',
        CellView::FlaggedMine => 'X',
    }
}

fn print_board(session: &GameSession) {
    let (rows, cols) = session.board().size();

    print!("    ");
    for col in 0..cols {
        print!("{:>2}", col % 100);
    }
    println!();
    for row in 0..rows {
        print!("{row:>3} ");
        for col in 0..cols {
            print!(" {}", cell_char(session.board().cell_at((row, col))));
        }
        println!();
    }
    println!(
        "mines left: {:>3}  time: {}  [{}]",
        session.mines_left(),
        format_time(session.elapsed_secs()),
        state_label(session),
    );
}

fn state_label(session: &GameSession) -> &'static str {
    if session.state().is_paused() {
        "paused"
    } else {
        match session.result() {
            Some(GameResult::Won) => "won",
            Some(GameResult::Lost) => "lost",
            None => "playing",
        }
    }
}

fn print_scores(scores: &ScoreBoard, highlight: Option<(&str, u32)>) {
    println!("LEADERBOARD");
    if scores.entries().is_empty() {
        println!("  (no scores yet)");
    }
    for (rank, entry) in scores.entries().iter().enumerate() {
        let marker = match highlight {
            Some((name, seconds)) if entry.name == name && entry.seconds == seconds => " *",
            _ => "",
        };
        println!("  {}. {} {}{marker}", rank + 1, entry.formatted, entry.name);
    }
}
