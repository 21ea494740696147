use sea_orm_migration::sea_query::extension::postgres::Type;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(ProductType::Enum)
                    .values([ProductType::DigitalPrintable, ProductType::WeddingInvitation])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(AssetEntityType::Enum)
                    .values([
                        AssetEntityType::ProductThumbnail,
                        AssetEntityType::VariantPhoto,
                        AssetEntityType::DigitalAsset,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(pk_uuid(Products::Id).default(Expr::cust("gen_random_uuid()")))
                    .col(text(Products::Title))
                    .col(text(Products::Description))
                    .col(text(Products::ThumbnailUrl))
                    .col(uuid_null(Products::FeaturedPhotoId))
                    .col(boolean(Products::IsActive).default(true))
                    .col(json_binary(Products::Metadata).default(Expr::cust("'{}'::jsonb")))
                    .col(
                        ColumnDef::new(Products::Tags)
                            .array(ColumnType::Text)
                            .not_null()
                            .default(Expr::cust("'{}'::TEXT[]")),
                    )
                    .col(
                        ColumnDef::new(Products::Type)
                            .enumeration(
                                ProductType::Enum,
                                [ProductType::DigitalPrintable, ProductType::WeddingInvitation],
                            )
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(Products::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Products::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProductVariants::Table)
                    .if_not_exists()
                    .col(pk_uuid(ProductVariants::Id).default(Expr::cust("gen_random_uuid()")))
                    .col(uuid(ProductVariants::ProductId))
                    .col(text(ProductVariants::Title))
                    .col(integer(ProductVariants::Price))
                    .col(text_null(ProductVariants::DigitalAssetFileName))
                    .col(integer_null(ProductVariants::DigitalAssetSize))
                    .col(text_null(ProductVariants::DigitalAssetUrl))
                    .col(boolean(ProductVariants::IsActive).default(true))
                    .col(json_binary(ProductVariants::Metadata).default(Expr::cust("'{}'::jsonb")))
                    .col(integer(ProductVariants::SortOrder).default(0))
                    .col(
                        timestamp_with_time_zone(ProductVariants::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(ProductVariants::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_variants_product_id")
                            .from(ProductVariants::Table, ProductVariants::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(VariantPhotos::Table)
                    .if_not_exists()
                    .col(pk_uuid(VariantPhotos::Id).default(Expr::cust("gen_random_uuid()")))
                    .col(uuid(VariantPhotos::VariantId))
                    .col(text(VariantPhotos::Url))
                    .col(integer(VariantPhotos::SortOrder).default(0))
                    .col(
                        timestamp_with_time_zone(VariantPhotos::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_variant_photos_variant_id")
                            .from(VariantPhotos::Table, VariantPhotos::VariantId)
                            .to(ProductVariants::Table, ProductVariants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Both tables must exist before the product can point at its featured photo
        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_products_featured_photo_id")
                    .from(Products::Table, Products::FeaturedPhotoId)
                    .to(VariantPhotos::Table, VariantPhotos::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AssetReferences::Table)
                    .if_not_exists()
                    .col(pk_uuid(AssetReferences::Id).default(Expr::cust("gen_random_uuid()")))
                    .col(text(AssetReferences::Url))
                    .col(
                        ColumnDef::new(AssetReferences::EntityType)
                            .enumeration(
                                AssetEntityType::Enum,
                                [
                                    AssetEntityType::ProductThumbnail,
                                    AssetEntityType::VariantPhoto,
                                    AssetEntityType::DigitalAsset,
                                ],
                            )
                            .not_null(),
                    )
                    .col(uuid(AssetReferences::EntityId))
                    .col(boolean(AssetReferences::IsActive).default(true))
                    .col(
                        timestamp_with_time_zone(AssetReferences::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create indexes
        manager
            .create_index(
                Index::create()
                    .name("idx_products_created_at")
                    .table(Products::Table)
                    .col(Products::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_type")
                    .table(Products::Table)
                    .col(Products::Type)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_product_variants_product_id")
                    .table(ProductVariants::Table)
                    .col(ProductVariants::ProductId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_variant_photos_variant_id")
                    .table(VariantPhotos::Table)
                    .col(VariantPhotos::VariantId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_asset_references_entity_id")
                    .table(AssetReferences::Table)
                    .col(AssetReferences::EntityId)
                    .to_owned(),
            )
            .await?;

        let db = manager.get_connection();

        // Tag filtering uses the && operator
        db.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_products_tags ON products USING GIN (tags)",
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE TRIGGER products_touch_updated_at
                BEFORE UPDATE ON products
                FOR EACH ROW
                EXECUTE FUNCTION util.touch_updated_at()
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE TRIGGER product_variants_touch_updated_at
                BEFORE UPDATE ON product_variants
                FOR EACH ROW
                EXECUTE FUNCTION util.touch_updated_at()
            "#,
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AssetReferences::Table).to_owned())
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name("fk_products_featured_photo_id")
                    .table(Products::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(VariantPhotos::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ProductVariants::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(AssetEntityType::Enum).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(ProductType::Enum).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    Title,
    Description,
    ThumbnailUrl,
    FeaturedPhotoId,
    IsActive,
    Metadata,
    Tags,
    Type,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ProductVariants {
    Table,
    Id,
    ProductId,
    Title,
    Price,
    DigitalAssetFileName,
    DigitalAssetSize,
    DigitalAssetUrl,
    IsActive,
    Metadata,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum VariantPhotos {
    Table,
    Id,
    VariantId,
    Url,
    SortOrder,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AssetReferences {
    Table,
    Id,
    Url,
    EntityType,
    EntityId,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ProductType {
    #[sea_orm(iden = "product_type")]
    Enum,
    #[sea_orm(iden = "DIGITAL_PRINTABLE")]
    DigitalPrintable,
    #[sea_orm(iden = "WEDDING_INVITATION")]
    WeddingInvitation,
}

#[derive(DeriveIden)]
enum AssetEntityType {
    #[sea_orm(iden = "asset_entity_type")]
    Enum,
    #[sea_orm(iden = "product_thumbnail")]
    ProductThumbnail,
    #[sea_orm(iden = "variant_photo")]
    VariantPhoto,
    #[sea_orm(iden = "digital_asset")]
    DigitalAsset,
}
