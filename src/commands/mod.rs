//! # CLI Command Implementations
//!
//! One module per subcommand. Each defines an `Args` struct derived with
//! `clap` and an `execute` function that carries out the command by
//! calling into the `fleet_sync` library.

pub mod completions;
pub mod sync;
