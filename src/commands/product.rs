use super::{print_json, CommandRunner};
use crate::cli;
use crate::service::Services;
use crate::types::ProductInput;
use anyhow::{anyhow, Context, Result};

impl CommandRunner for cli::ProductCmd {
    fn run(&self, services: &Services) -> Result<()> {
        let products = &services.products;
        match self {
            cli::ProductCmd::List { category } => {
                let list = match category {
                    Some(id) => products.list_by_category(*id),
                    None => products.list_all(),
                }
                .context("listing products")?;
                print_json(&list)
            }
            cli::ProductCmd::Show { id } => {
                let product = products
                    .get_by_id(*id)?
                    .ok_or_else(|| anyhow!("product {id} not found"))?;
                print_json(&product)
            }
            cli::ProductCmd::Add(fields) => {
                let created = products.create(ProductInput::from(fields))?;
                print_json(&created)
            }
            cli::ProductCmd::Update { id, fields } => {
                let updated = products.update(*id, ProductInput::from(fields))?;
                print_json(&updated)
            }
            cli::ProductCmd::Remove { id } => {
                products.delete(*id)?;
                log::info!("product {id} removed");
                Ok(())
            }
            cli::ProductCmd::Search { term } => {
                let found = products
                    .search_by_description(term)
                    .context("searching products")?;
                print_json(&found)
            }
            cli::ProductCmd::LowStock { threshold } => {
                let low = products
                    .low_stock(*threshold)
                    .context("checking low stock")?;
                print_json(&low)
            }
            cli::ProductCmd::Value => {
                let total = products
                    .total_inventory_value()
                    .context("computing inventory value")?;
                println!("{total:.2}");
                Ok(())
            }
        }
    }
}
