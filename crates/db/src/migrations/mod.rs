//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250601_000001_create_user_table;
mod m20250601_000002_create_post_table;
mod m20250601_000003_create_story_table;
mod m20250601_000004_create_comment_table;
mod m20250601_000005_create_like_table;
mod m20250601_000006_create_follower_table;
mod m20250601_000007_create_follow_request_table;
mod m20250601_000008_create_block_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_user_table::Migration),
            Box::new(m20250601_000002_create_post_table::Migration),
            Box::new(m20250601_000003_create_story_table::Migration),
            Box::new(m20250601_000004_create_comment_table::Migration),
            Box::new(m20250601_000005_create_like_table::Migration),
            Box::new(m20250601_000006_create_follower_table::Migration),
            Box::new(m20250601_000007_create_follow_request_table::Migration),
            Box::new(m20250601_000008_create_block_table::Migration),
        ]
    }
}
