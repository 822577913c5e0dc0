use sea_orm_migration::prelude::*;

mod m20250924_000001_create_ideas_table;
mod m20250924_000002_create_votes_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250924_000001_create_ideas_table::Migration),
            Box::new(m20250924_000002_create_votes_table::Migration),
        ]
    }
}
