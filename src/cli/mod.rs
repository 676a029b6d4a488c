mod args;
mod category_cmd;
mod command;
mod product_cmd;

pub use args::Cli;
pub use category_cmd::CategoryCmd;
pub use command::Command;
pub use product_cmd::{ProductCmd, ProductFields};

pub use args::parse;
