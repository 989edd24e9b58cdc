use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// No foreign key to roles: the backing store has no referential integrity,
// so the role store sweeps dependent claims itself on role delete.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RoleClaims::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RoleClaims::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RoleClaims::RoleId).uuid().not_null())
                    .col(ColumnDef::new(RoleClaims::ClaimType).string().not_null())
                    .col(ColumnDef::new(RoleClaims::ClaimValue).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_role_claims_role_id")
                    .table(RoleClaims::Table)
                    .col(RoleClaims::RoleId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RoleClaims::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum RoleClaims {
    Table,
    Id,
    RoleId,
    ClaimType,
    ClaimValue,
}
