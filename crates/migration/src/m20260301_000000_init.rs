//! Initial schema migration.
//!
//! - `categories`: spending buckets shared by every user
//! - `transactions`: logged money movements, per user
//! - `budgets`: per-category monthly limits, per user
//! - `chat_logs`: assistant conversation transcript, per user

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    Name,
    NameNorm,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    UserId,
    CategoryId,
    AmountMinor,
    Merchant,
    OccurredAt,
    RawText,
}

#[derive(Iden)]
enum Budgets {
    Table,
    Id,
    UserId,
    CategoryId,
    LimitMinor,
    Period,
}

#[derive(Iden)]
enum ChatLogs {
    Table,
    Id,
    UserId,
    MessageText,
    Sender,
    Timestamp,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Categories
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(ColumnDef::new(Categories::NameNorm).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-categories-name_norm-unique")
                    .table(Categories::Table)
                    .col(Categories::NameNorm)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Transactions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Transactions::CategoryId).integer())
                    .col(
                        ColumnDef::new(Transactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Merchant).string())
                    .col(
                        ColumnDef::new(Transactions::OccurredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::RawText).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-category_id")
                            .from(Transactions::Table, Transactions::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-user_id-occurred_at")
                    .table(Transactions::Table)
                    .col(Transactions::UserId)
                    .col(Transactions::OccurredAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Budgets
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Budgets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Budgets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Budgets::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Budgets::CategoryId).integer().not_null())
                    .col(ColumnDef::new(Budgets::LimitMinor).big_integer().not_null())
                    .col(
                        ColumnDef::new(Budgets::Period)
                            .string()
                            .not_null()
                            .default("Monthly"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-budgets-category_id")
                            .from(Budgets::Table, Budgets::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-budgets-user_id")
                    .table(Budgets::Table)
                    .col(Budgets::UserId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Chat logs
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(ChatLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChatLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ChatLogs::UserId).big_integer().not_null())
                    .col(ColumnDef::new(ChatLogs::MessageText).text().not_null())
                    .col(ColumnDef::new(ChatLogs::Sender).string().not_null())
                    .col(
                        ColumnDef::new(ChatLogs::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-chat_logs-user_id-timestamp")
                    .table(ChatLogs::Table)
                    .col(ChatLogs::UserId)
                    .col(ChatLogs::Timestamp)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChatLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Budgets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        Ok(())
    }
}
