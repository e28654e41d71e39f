use sea_orm_migration::{MigrationTrait, MigratorTrait};

mod initial_001;

/// Schema migrations for the books table, applied on connect.
pub struct Migrator;

impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(initial_001::Migration)]
    }
}
