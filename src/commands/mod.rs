//! CLI commands for mechdb.
//!
//! Thin glue over the repositories: argument parsing, dispatch, output
//! rendering, and the mapping from error kinds to process exit codes.

pub mod table;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::{Filter, Properties, StoreError};
use crate::infra::db::Database;

#[derive(Parser, Debug)]
#[command(name = "mechdb")]
#[command(version)]
#[command(about = "Store and query mechanical material properties", long_about = None)]
pub struct Cli {
    /// Path to the store file (falls back to $MECHDB_STORE)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new, empty store
    Init {
        /// Replace an existing store at that path
        #[arg(long)]
        force: bool,
    },

    /// Add a category
    AddCategory { name: String },

    /// Remove a category and every material in it
    RemoveCategory { name: String },

    /// List all categories
    Categories {
        #[arg(long)]
        json: bool,
    },

    /// Add a material to an existing category
    AddMaterial {
        name: String,
        #[arg(short, long)]
        category: String,
    },

    /// Remove a material and its recorded properties
    RemoveMaterial { name: String },

    /// Record property values for a material (unnamed fields keep
    /// their previous value)
    Set {
        material: String,
        /// Density in kg/m³
        #[arg(long)]
        density: Option<f64>,
        /// Modulus of elasticity in GPa
        #[arg(long)]
        elasticity: Option<f64>,
        /// Modulus of rigidity in GPa
        #[arg(long)]
        rigidity: Option<f64>,
        /// Yield strength in MPa
        #[arg(long)]
        yield_strength: Option<f64>,
        /// Ultimate tensile strength in MPa
        #[arg(long)]
        tensile: Option<f64>,
        /// Percent elongation
        #[arg(long)]
        elongation: Option<f64>,
    },

    /// Move a material to another category
    Move {
        material: String,
        #[arg(short, long)]
        category: String,
    },

    /// Show one material with its properties
    Show {
        material: String,
        #[arg(long)]
        json: bool,
    },

    /// List materials, either all of them or one category's
    List {
        category: Option<String>,
        /// Column to sort by (all-materials listing only)
        #[arg(long, default_value = "material")]
        order_by: String,
        #[arg(long)]
        desc: bool,
        /// Keep only rows where `<COLUMN> <OP> <VALUE>` holds
        /// (repeatable; ops: < <= = >= >)
        #[arg(
            long,
            num_args = 3,
            value_names = ["COLUMN", "OP", "VALUE"],
            action = clap::ArgAction::Append
        )]
        filter: Vec<String>,
        #[arg(long)]
        json: bool,
    },

    /// Print aggregate counts and means per category
    Summary {
        category: Option<String>,
        #[arg(long)]
        json: bool,
    },
}

/// Run a parsed command to completion.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let store = Database::resolve_path(cli.store).ok_or_else(|| {
        StoreError::Validation("no store path given; use --store or set MECHDB_STORE".into())
    })?;

    if let Command::Init { force } = cli.command {
        Database::initialize(&store, force)?.close()?;
        println!("Created store at {}", store.display());
        return Ok(());
    }

    let db = Database::open(&store)?;
    let result = dispatch(&db, cli.command);
    let closed = db.close();
    result?;
    closed?;
    Ok(())
}

fn dispatch(db: &Database, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Init { .. } => unreachable!("init is handled before the store is opened"),

        Command::AddCategory { name } => {
            db.categories().add(&name)?;
            println!("Added category '{name}'");
        }
        Command::RemoveCategory { name } => {
            db.categories().delete(&name)?;
            println!("Removed category '{name}' and its materials");
        }
        Command::Categories { json } => {
            let categories = db.categories().list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&categories)?);
            } else {
                for category in &categories {
                    println!("{}", category.name);
                }
            }
        }

        Command::AddMaterial { name, category } => {
            db.materials().add(&name, &category)?;
            println!("Added material '{name}' ({category})");
        }
        Command::RemoveMaterial { name } => {
            db.materials().delete(&name)?;
            println!("Removed material '{name}'");
        }
        Command::Set {
            material,
            density,
            elasticity,
            rigidity,
            yield_strength,
            tensile,
            elongation,
        } => {
            let patch = Properties {
                density,
                modulus_of_elasticity: elasticity,
                modulus_of_rigidity: rigidity,
                yield_strength,
                ultimate_tensile_strength: tensile,
                percent_elongation: elongation,
            };
            if patch.is_empty() {
                return Err(
                    StoreError::Validation("no property flags given; nothing to set".into()).into(),
                );
            }
            db.materials().set_properties(&material, &patch)?;
            println!("Updated '{material}'");
        }
        Command::Move { material, category } => {
            db.materials().update_category(&material, &category)?;
            println!("Moved '{material}' to '{category}'");
        }

        Command::Show { material, json } => {
            let record = db.materials().get(&material)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print!("{}", table::render_materials(std::slice::from_ref(&record)));
            }
        }
        Command::List {
            category,
            order_by,
            desc,
            filter,
            json,
        } => {
            let filters = parse_filters(&filter)?;
            let records = match category {
                Some(_) if !filters.is_empty() => {
                    return Err(StoreError::Validation(
                        "--filter applies to the all-materials listing; omit the category".into(),
                    )
                    .into());
                }
                Some(category) => db.materials().list_by_category(&category)?,
                None => db.materials().list_filtered(&filters, &order_by, desc)?,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print!("{}", table::render_materials(&records));
            }
        }
        Command::Summary { category, json } => {
            let summaries = match category {
                Some(category) => vec![db.categories().summarize(&category)?],
                None => db.categories().summarize_all()?,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else {
                print!("{}", table::render_summaries(&summaries));
            }
        }
    }
    Ok(())
}

/// Turn clap's flat `--filter` value list (groups of three) into
/// typed filters.
fn parse_filters(raw: &[String]) -> Result<Vec<Filter>, StoreError> {
    raw.chunks(3)
        .map(|chunk| match chunk {
            [column, op, value] => Ok(Filter {
                column: column.clone(),
                op: op.parse()?,
                value: value.clone(),
            }),
            _ => Err(StoreError::Validation(
                "--filter takes <column> <op> <value>".into(),
            )),
        })
        .collect()
}

/// Stable process exit codes, one class per error kind.
///
/// 0 success, 1 internal/database failure, 2 invalid argument,
/// 3 store not found, 4 store already exists.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<StoreError>() {
        Some(StoreError::NotFound) => 3,
        Some(StoreError::AlreadyExists) => 4,
        Some(
            StoreError::Duplicate(_)
            | StoreError::UnknownCategory(_)
            | StoreError::UnknownMaterial(_)
            | StoreError::Validation(_),
        ) => 2,
        // Corrupt schema, busy, transaction/I/O failure, raw SQLite errors.
        Some(_) => 1,
        None => 1,
    }
}
