//! Terminal client for the-pad.

mod ctx;
mod input;
mod prompt;
mod render;
mod terminal;

use std::{
  fs::File,
  path::PathBuf,
  sync::Mutex,
};

use clap::Parser;
use crossterm::event::{
  self,
  Event,
  KeyEventKind,
};
use eyre::{
  Result,
  WrapErr,
};
use the_lib::{
  buffer::Buffer,
  config::Config,
  editor::Editor,
};
use tracing_subscriber::EnvFilter;

use crate::ctx::Ctx;

#[derive(Debug, Parser)]
#[command(name = "the-pad")]
#[command(about = "A small terminal text editor")]
struct Cli {
  /// Increase log verbosity (-v, -vv, -vvv)
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,

  /// Write logs to this file
  #[arg(long, value_name = "FILE")]
  log: Option<PathBuf>,

  /// Read configuration from this file instead of the default location
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Files to open, one buffer each
  files: Vec<PathBuf>,
}

/// Logs go to a file only; anything written to the terminal would land in
/// the middle of the editor screen.
fn setup_logging(cli: &Cli) -> Result<()> {
  let Some(path) = &cli.log else {
    return Ok(());
  };
  let file =
    File::create(path).wrap_err_with(|| format!("failed to create log file {}", path.display()))?;

  let level = match cli.verbose {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
    .with_writer(Mutex::new(file))
    .with_ansi(false)
    .init();
  Ok(())
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  setup_logging(&cli)?;

  let config = match &cli.config {
    Some(path) => Config::load(path)?,
    None => Config::load_default()?,
  };
  let keymap = config.keymap()?;

  let buffers = cli
    .files
    .iter()
    .map(|path| Buffer::open(path.clone()))
    .collect::<Result<Vec<_>, _>>()?;
  let mut ctx = Ctx::new(Editor::with_buffers(buffers), keymap, config);

  let mut terminal = terminal::Terminal::new()?;
  terminal.enter_raw_mode()?;
  let result = run(&mut ctx, &mut terminal);
  terminal.leave_raw_mode()?;
  result
}

fn run(ctx: &mut Ctx, terminal: &mut terminal::Terminal) -> Result<()> {
  tracing::info!("started with {} buffer(s)", ctx.editor.buffer_count());

  while !ctx.should_quit {
    if ctx.needs_render {
      render::render(ctx, terminal)?;
      ctx.needs_render = false;
    }

    match event::read()? {
      Event::Key(key) if key.kind == KeyEventKind::Press => {
        ctx.handle_key(terminal, input::to_key_event(key));
      },
      Event::Resize(width, height) => {
        terminal.resize(width, height)?;
        ctx.needs_render = true;
      },
      _ => {},
    }
  }

  tracing::info!("quitting");
  Ok(())
}
