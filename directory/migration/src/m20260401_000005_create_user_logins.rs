use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserLogins::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserLogins::LoginProvider).string().not_null())
                    .col(ColumnDef::new(UserLogins::ProviderKey).string().not_null())
                    .col(ColumnDef::new(UserLogins::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(UserLogins::ProviderDisplayName)
                            .string()
                            .null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(UserLogins::LoginProvider)
                            .col(UserLogins::ProviderKey),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_logins_user_id")
                    .table(UserLogins::Table)
                    .col(UserLogins::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserLogins::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserLogins {
    Table,
    LoginProvider,
    ProviderKey,
    UserId,
    ProviderDisplayName,
}
