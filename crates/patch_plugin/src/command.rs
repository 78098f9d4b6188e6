//! Console command contract.
//!
//! The console's text UI and tokenizer live elsewhere; this module only
//! defines how a command line reaches the patch manager. The `patch` command
//! touches the manager exclusively through [`RenderModeControl`].
//!
//! ```text
//! patch mode                 -> current render mode
//! patch mode <texture|depth|terrain>   -> set + broadcast, returns new mode
//! anything else              -> usage error, nothing changes
//! ```

use std::collections::HashMap;

use tracing::debug;

use crate::clock::Clock;
use crate::error::CommandError;
use crate::manager::PatchManager;
use crate::presentation::TileFactory;
use crate::tile::RenderMode;

pub const PATCH_KEYWORD: &str = "patch";
pub const PATCH_USAGE: &str = "patch mode [texture|depth|terrain]";

/// Read/write access to the global render mode.
pub trait RenderModeControl {
  fn current_render_mode(&self) -> RenderMode;
  fn apply_render_mode(&mut self, mode: RenderMode);
}

impl<F: TileFactory, C: Clock> RenderModeControl for PatchManager<F, C> {
  fn current_render_mode(&self) -> RenderMode {
    self.render_mode()
  }

  fn apply_render_mode(&mut self, mode: RenderMode) {
    self.set_render_mode(mode);
  }
}

/// A console command operating on context `Ctx`.
pub trait ConsoleCommand<Ctx: ?Sized> {
  fn keyword(&self) -> &'static str;

  /// Run with the arguments following the keyword.
  fn execute(&self, ctx: &mut Ctx, args: &[&str]) -> Result<String, CommandError>;
}

/// Keyword-routed command registry.
pub struct CommandDispatcher<Ctx: ?Sized> {
  commands: HashMap<&'static str, Box<dyn ConsoleCommand<Ctx> + Send + Sync>>,
}

impl<Ctx: ?Sized> Default for CommandDispatcher<Ctx> {
  fn default() -> Self {
    Self::new()
  }
}

impl<Ctx: ?Sized> CommandDispatcher<Ctx> {
  pub fn new() -> Self {
    Self {
      commands: HashMap::new(),
    }
  }

  /// Register a command, replacing any previous one with the same keyword.
  pub fn register(&mut self, command: impl ConsoleCommand<Ctx> + Send + Sync + 'static) {
    debug!(keyword = command.keyword(), "console command registered");
    self.commands.insert(command.keyword(), Box::new(command));
  }

  pub fn contains(&self, keyword: &str) -> bool {
    self.commands.contains_key(keyword)
  }

  /// Split `line` on whitespace and route it by its first word.
  pub fn dispatch(&self, ctx: &mut Ctx, line: &str) -> Result<String, CommandError> {
    let mut words = line.split_whitespace();
    let keyword = words.next().ok_or(CommandError::Empty)?;
    let args: Vec<&str> = words.collect();
    let command = self
      .commands
      .get(keyword.to_ascii_lowercase().as_str())
      .ok_or_else(|| CommandError::UnknownCommand(keyword.to_string()))?;
    command.execute(ctx, &args)
  }
}

/// The `patch` console command.
#[derive(Clone, Copy, Debug, Default)]
pub struct PatchCommand;

impl PatchCommand {
  /// Query or set the render mode.
  pub fn run<Ctx: RenderModeControl + ?Sized>(
    ctx: &mut Ctx,
    args: &[&str],
  ) -> Result<RenderMode, CommandError> {
    match args {
      [sub] if sub.eq_ignore_ascii_case("mode") => Ok(ctx.current_render_mode()),
      [sub, value] if sub.eq_ignore_ascii_case("mode") => {
        let mode: RenderMode = value.parse()?;
        ctx.apply_render_mode(mode);
        Ok(mode)
      }
      _ => Err(CommandError::Usage(PATCH_USAGE)),
    }
  }
}

impl<Ctx: RenderModeControl + ?Sized> ConsoleCommand<Ctx> for PatchCommand {
  fn keyword(&self) -> &'static str {
    PATCH_KEYWORD
  }

  fn execute(&self, ctx: &mut Ctx, args: &[&str]) -> Result<String, CommandError> {
    PatchCommand::run(ctx, args).map(|mode| mode.to_string())
  }
}

/// Install the `patch` command on `dispatcher`.
pub fn register_patch_command<Ctx: RenderModeControl + ?Sized>(
  dispatcher: &mut CommandDispatcher<Ctx>,
) {
  dispatcher.register(PatchCommand);
}

#[cfg(test)]
#[path = "command_test.rs"]
mod command_test;
