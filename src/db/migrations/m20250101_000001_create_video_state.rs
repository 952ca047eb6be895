use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VideoState::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VideoState::Path)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(VideoState::PlaybackPosition)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(VideoState::AudioTrack).integer().null())
                    .col(ColumnDef::new(VideoState::SubtitleTrack).integer().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VideoState::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum VideoState {
    Table,
    Path,
    PlaybackPosition,
    AudioTrack,
    SubtitleTrack,
}
