use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Genre::Table)
                    .if_not_exists()
                    .col(pk_auto(Genre::Id))
                    .col(string(Genre::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Country::Table)
                    .if_not_exists()
                    .col(pk_auto(Country::Id))
                    .col(string(Country::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Actor::Table)
                    .if_not_exists()
                    .col(pk_auto(Actor::Id))
                    .col(string(Actor::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Movie::Table)
                    .if_not_exists()
                    .col(pk_auto(Movie::Id))
                    .col(string(Movie::Name))
                    .col(string(Movie::ImageUrl))
                    .col(string(Movie::VideoUrl))
                    .col(integer(Movie::View).default(0))
                    .col(big_integer(Movie::CreatedAt))
                    .col(integer_null(Movie::GenreId))
                    .col(integer_null(Movie::CountryId))
                    .col(integer_null(Movie::ActorId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_genre_id")
                            .from(Movie::Table, Movie::GenreId)
                            .to(Genre::Table, Genre::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_country_id")
                            .from(Movie::Table, Movie::CountryId)
                            .to(Country::Table, Country::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_actor_id")
                            .from(Movie::Table, Movie::ActorId)
                            .to(Actor::Table, Actor::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_created_at")
                    .table(Movie::Table)
                    .col(Movie::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_view")
                    .table(Movie::Table)
                    .col(Movie::View)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Movie::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Actor::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Country::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Genre::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Movie {
    Table,
    Id,
    Name,
    ImageUrl,
    VideoUrl,
    View,
    CreatedAt,
    GenreId,
    CountryId,
    ActorId,
}

#[derive(DeriveIden)]
enum Genre {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Country {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Actor {
    Table,
    Id,
    Name,
}
