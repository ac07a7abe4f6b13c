mod args;

pub use args::{Cli, Command, RunArgs, SettingsArgs, VarsArgs};
