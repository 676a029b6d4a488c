use clap::Subcommand;

#[derive(Subcommand, Debug, Clone)]
pub enum CategoryCmd {
    #[command(about = "List all categories ordered by description")]
    List,
    #[command(about = "Create a category")]
    Add {
        #[arg(value_name = "DESCRIPTION")]
        description: String,
    },
    #[command(about = "Change a category's description")]
    Rename {
        #[arg(value_name = "ID")]
        id: i64,
        #[arg(value_name = "DESCRIPTION")]
        description: String,
    },
    #[command(about = "Remove a category that no product references")]
    Remove {
        #[arg(value_name = "ID")]
        id: i64,
    },
}
