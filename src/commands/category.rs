use super::{print_json, CommandRunner};
use crate::cli;
use crate::service::Services;
use anyhow::{Context, Result};

impl CommandRunner for cli::CategoryCmd {
    fn run(&self, services: &Services) -> Result<()> {
        let categories = &services.categories;
        match self {
            cli::CategoryCmd::List => {
                let all = categories.list_all().context("listing categories")?;
                print_json(&all)
            }
            cli::CategoryCmd::Add { description } => {
                let created = categories.create(description)?;
                print_json(&created)
            }
            cli::CategoryCmd::Rename { id, description } => {
                let updated = categories.update(*id, description)?;
                print_json(&updated)
            }
            cli::CategoryCmd::Remove { id } => {
                categories.delete(*id)?;
                log::info!("category {id} removed");
                Ok(())
            }
        }
    }
}
