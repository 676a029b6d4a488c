use serde::Serialize;

use crate::cli::Command;
use crate::service::Services;

pub mod category;
pub mod product;

pub trait CommandRunner {
    fn run(&self, services: &Services) -> anyhow::Result<()>;
}

impl Command {
    pub fn run(&self, services: &Services) -> anyhow::Result<()> {
        match self {
            Command::Category { cmd } => cmd.run(services),
            Command::Product { cmd } => cmd.run(services),
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{CategoryCmd, ProductCmd, ProductFields};
    use crate::storage::test_support::test_db;

    #[test]
    fn commands_drive_the_services() {
        let (_dir, db) = test_db();
        let services = Services::new(db);

        Command::Category {
            cmd: CategoryCmd::Add {
                description: "Tools".into(),
            },
        }
        .run(&services)
        .unwrap();
        let tools = services.categories.list_all().unwrap()[0].id.unwrap();

        Command::Product {
            cmd: ProductCmd::Add(ProductFields {
                description: "Hammer".into(),
                price: 9.99,
                quantity: 4,
                category: tools,
            }),
        }
        .run(&services)
        .unwrap();
        assert_eq!(services.products.list_all().unwrap().len(), 1);

        let err = Command::Category {
            cmd: CategoryCmd::Remove { id: tools },
        }
        .run(&services)
        .unwrap_err();
        assert!(err.to_string().contains("1 product(s)"));
    }

    #[test]
    fn show_missing_product_fails() {
        let (_dir, db) = test_db();
        let services = Services::new(db);
        let err = Command::Product {
            cmd: ProductCmd::Show { id: 5 },
        }
        .run(&services)
        .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
