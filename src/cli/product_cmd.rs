use clap::{Args, Subcommand};

use crate::service::DEFAULT_LOW_STOCK_THRESHOLD;
use crate::types::ProductInput;

#[derive(Args, Debug, Clone)]
pub struct ProductFields {
    #[arg(long, value_name = "TEXT", help = "Product description")]
    pub description: String,
    #[arg(long, value_name = "AMOUNT", help = "Unit price, must be greater than zero")]
    pub price: f64,
    #[arg(
        long,
        value_name = "N",
        default_value_t = 0,
        allow_negative_numbers = true,
        help = "Units in stock"
    )]
    pub quantity: i64,
    #[arg(long, value_name = "ID", help = "Owning category id")]
    pub category: i64,
}

impl From<&ProductFields> for ProductInput {
    fn from(fields: &ProductFields) -> Self {
        ProductInput {
            description: fields.description.clone(),
            unit_price: fields.price,
            stock_quantity: fields.quantity,
            category_id: fields.category,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum ProductCmd {
    #[command(about = "List products, optionally restricted to one category")]
    List {
        #[arg(long, value_name = "ID")]
        category: Option<i64>,
    },
    #[command(about = "Show a single product")]
    Show {
        #[arg(value_name = "ID")]
        id: i64,
    },
    #[command(about = "Create a product")]
    Add(ProductFields),
    #[command(about = "Replace every field of an existing product")]
    Update {
        #[arg(value_name = "ID")]
        id: i64,
        #[command(flatten)]
        fields: ProductFields,
    },
    #[command(about = "Remove a product")]
    Remove {
        #[arg(value_name = "ID")]
        id: i64,
    },
    #[command(about = "Case-insensitive substring search on descriptions")]
    Search {
        #[arg(value_name = "TERM")]
        term: String,
    },
    #[command(about = "Products whose stock is below a threshold")]
    LowStock {
        #[arg(long, value_name = "N", default_value_t = DEFAULT_LOW_STOCK_THRESHOLD)]
        threshold: i64,
    },
    #[command(about = "Total value of stock (price times quantity)")]
    Value,
}
