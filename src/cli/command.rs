use clap::Subcommand;

use crate::cli::category_cmd::CategoryCmd;
use crate::cli::product_cmd::ProductCmd;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(
        about = "Category management commands",
        long_about = "List, create, rename and remove categories. A category cannot be removed while products reference it."
    )]
    Category {
        #[command(subcommand)]
        cmd: CategoryCmd,
    },
    #[command(
        about = "Product management commands",
        long_about = "List, search, create, update and remove products, and report low stock and total inventory value."
    )]
    Product {
        #[command(subcommand)]
        cmd: ProductCmd,
    },
}
