use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Accounts are keyed by their Google email
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(text(Users::Email).primary_key())
                    .col(text(Users::Name).default(""))
                    .col(text(Users::Picture).default(""))
                    .col(text(Users::GoogleId))
                    .col(boolean(Users::IsAdmin).default(false))
                    .col(boolean(Users::IsDeleted).default(false))
                    .col(
                        timestamp_with_time_zone(Users::LastLogin)
                            .default(Expr::current_timestamp()),
                    )
                    .col(text_null(Users::LastIp))
                    .col(text_null(Users::LastUserAgent))
                    .col(
                        timestamp_with_time_zone(Users::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Users::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_google_id")
                    .table(Users::Table)
                    .col(Users::GoogleId)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TRIGGER users_touch_updated_at
                    BEFORE UPDATE ON users
                    FOR EACH ROW
                    EXECUTE FUNCTION util.touch_updated_at()
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TRIGGER IF EXISTS users_touch_updated_at ON users")
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Email,
    Name,
    Picture,
    GoogleId,
    IsAdmin,
    IsDeleted,
    LastLogin,
    LastIp,
    LastUserAgent,
    CreatedAt,
    UpdatedAt,
}
