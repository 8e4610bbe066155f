pub mod command_utils;
pub mod file_utils;

pub use command_utils::{
    CommandInvocation, CommandOutput, CommandRunner, DryRunRunner, SystemCommandRunner,
};
