//! Integration tests for the store as a whole: schema manager,
//! repositories, and the CLI command layer working against a real file.

use mechdb::commands::{self, Cli};
use mechdb::domain::{Properties, StoreError};
use mechdb::infra::db::Database;
use clap::Parser;
use std::path::PathBuf;

#[test]
fn test_full_store_workflow() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("materials.db");

    // create store -> add_category -> add_material -> set_properties
    let db = Database::initialize(&path, false)?;
    db.categories().add("Steel")?;
    db.materials().add("A36", "Steel")?;
    db.materials().set_properties(
        "A36",
        &Properties {
            density: Some(7850.0),
            yield_strength: Some(250.0),
            ..Default::default()
        },
    )?;
    db.close()?;

    // get_material returns exactly what was stored, nulls elsewhere.
    let db = Database::open(&path)?;
    let record = db.materials().get("A36")?;
    assert_eq!(record.material, "A36");
    assert_eq!(record.category, "Steel");
    assert_eq!(record.properties.density, Some(7850.0));
    assert_eq!(record.properties.yield_strength, Some(250.0));
    assert_eq!(record.properties.modulus_of_elasticity, None);
    assert_eq!(record.properties.modulus_of_rigidity, None);
    assert_eq!(record.properties.ultimate_tensile_strength, None);
    assert_eq!(record.properties.percent_elongation, None);

    // Summary over one material equals its own values.
    let summary = db.categories().summarize("Steel")?;
    assert_eq!(summary.materials, 1);
    assert_eq!(summary.means.density, Some(7850.0));

    // Cascade: removing the category takes A36 and its properties along.
    db.categories().delete("Steel")?;
    assert!(matches!(
        db.materials().get("A36"),
        Err(StoreError::UnknownMaterial(_))
    ));
    assert!(db.categories().list()?.is_empty());
    db.close()?;

    Ok(())
}

#[test]
fn test_store_survives_reopen_with_partial_updates() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("materials.db");

    {
        let db = Database::initialize(&path, false)?;
        db.categories().add("Aluminum")?;
        db.materials().add("6061-T6", "Aluminum")?;
        db.materials().set_properties(
            "6061-T6",
            &Properties {
                density: Some(2700.0),
                ..Default::default()
            },
        )?;
        db.close()?;
    }

    // A later session updates one field; the earlier one persists.
    {
        let db = Database::open(&path)?;
        db.materials().set_properties(
            "6061-T6",
            &Properties {
                yield_strength: Some(276.0),
                ..Default::default()
            },
        )?;
        db.close()?;
    }

    let db = Database::open(&path)?;
    let record = db.materials().get("6061-T6")?;
    assert_eq!(record.properties.density, Some(2700.0));
    assert_eq!(record.properties.yield_strength, Some(276.0));
    Ok(())
}

#[test]
fn test_cli_commands_against_store_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("materials.db");

    let run = |args: &[&str]| -> anyhow::Result<()> {
        let mut argv = vec!["mechdb", "--store", path.to_str().unwrap()];
        argv.extend(args);
        commands::run(Cli::try_parse_from(argv)?)
    };

    run(&["init"])?;
    run(&["add-category", "Steel"])?;
    run(&["add-material", "A36", "--category", "Steel"])?;
    run(&["set", "A36", "--density", "7850", "--yield-strength", "250"])?;
    run(&["show", "A36"])?;
    run(&["list", "Steel"])?;
    run(&["summary"])?;

    // Re-initializing without --force maps to the "already exists" code.
    let err = run(&["init"]).unwrap_err();
    assert_eq!(commands::exit_code(&err), 4);
    run(&["init", "--force"])?;

    // The forced store is empty again.
    let db = Database::open(&path)?;
    assert!(db.categories().list()?.is_empty());
    db.close()?;

    // Operating on a nonexistent store maps to the "not found" code.
    let missing = dir.path().join("missing.db");
    let err = commands::run(Cli::try_parse_from([
        "mechdb",
        "--store",
        missing.to_str().unwrap(),
        "categories",
    ])?)
    .unwrap_err();
    assert_eq!(commands::exit_code(&err), 3);

    Ok(())
}

#[test]
fn test_cli_error_codes_for_bad_input() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("materials.db");

    let run = |args: &[&str]| -> anyhow::Result<()> {
        let mut argv = vec!["mechdb", "--store", path.to_str().unwrap()];
        argv.extend(args);
        commands::run(Cli::try_parse_from(argv)?)
    };

    run(&["init"])?;
    run(&["add-category", "Steel"])?;

    let duplicate = run(&["add-category", "steel"]).unwrap_err();
    assert_eq!(commands::exit_code(&duplicate), 2);

    let unknown = run(&["add-material", "A36", "--category", "Ceramic"]).unwrap_err();
    assert_eq!(commands::exit_code(&unknown), 2);

    let negative = {
        run(&["add-material", "A36", "--category", "Steel"])?;
        run(&["set", "A36", "--density", "-1"]).unwrap_err()
    };
    assert_eq!(commands::exit_code(&negative), 2);

    let nothing_to_set = run(&["set", "A36"]).unwrap_err();
    assert_eq!(commands::exit_code(&nothing_to_set), 2);

    Ok(())
}

#[test]
fn test_filtered_listing_via_commands() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("materials.db");

    let run = |args: &[&str]| -> anyhow::Result<()> {
        let mut argv = vec!["mechdb", "--store", path.to_str().unwrap()];
        argv.extend(args);
        commands::run(Cli::try_parse_from(argv)?)
    };

    run(&["init"])?;
    run(&["add-category", "Steel"])?;
    run(&["add-material", "A36", "--category", "Steel"])?;
    run(&["set", "A36", "--density", "7850"])?;

    run(&["list", "--filter", "density", ">", "7000"])?;
    run(&[
        "list", "--filter", "density", ">", "7000", "--filter", "material", "=", "a36",
    ])?;

    // Filters only make sense on the all-materials listing.
    let conflict = run(&["list", "Steel", "--filter", "density", ">", "7000"]).unwrap_err();
    assert_eq!(commands::exit_code(&conflict), 2);

    let bad_value = run(&["list", "--filter", "density", ">", "heavy"]).unwrap_err();
    assert_eq!(commands::exit_code(&bad_value), 2);

    Ok(())
}

#[test]
fn test_resolve_path_prefers_explicit_flag() {
    let explicit = Some(PathBuf::from("/tmp/explicit.db"));
    assert_eq!(
        Database::resolve_path(explicit.clone()),
        explicit,
        "explicit path wins over the environment"
    );
}

#[test]
fn test_corrupt_store_is_reported_as_such() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("not-a-store.db");
    std::fs::write(&path, b"text file pretending to be a store")?;

    let err = Database::open(&path).unwrap_err();
    assert!(matches!(&err, StoreError::CorruptSchema(_)));
    assert_eq!(commands::exit_code(&err.into()), 1);
    Ok(())
}

#[test]
fn test_move_and_sorted_listing_via_commands() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("materials.db");

    let db = Database::initialize(&path, false)?;
    db.categories().add("Steel")?;
    db.categories().add("Stainless")?;
    db.materials().add("A36", "Steel")?;
    db.materials().add("304", "Steel")?;
    db.materials()
        .set_properties("304", &Properties {
            density: Some(8000.0),
            ..Default::default()
        })?;
    db.materials().update_category("304", "Stainless")?;

    let stainless = db.materials().list_by_category("Stainless")?;
    assert_eq!(stainless.len(), 1);
    assert_eq!(stainless[0].material, "304");
    assert_eq!(stainless[0].properties.density, Some(8000.0));

    let by_density = db.materials().list_all("density", true)?;
    assert_eq!(by_density[0].material, "304");
    db.close()?;

    // CLI "move" goes through the same path.
    let cli = Cli::try_parse_from([
        "mechdb",
        "--store",
        path.to_str().unwrap(),
        "move",
        "304",
        "--category",
        "Steel",
    ])?;
    commands::run(cli)?;

    let db = Database::open(&path)?;
    assert_eq!(db.materials().get("304")?.category, "Steel");
    db.close()?;
    Ok(())
}
