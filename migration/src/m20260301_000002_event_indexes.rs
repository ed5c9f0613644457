//! 事件表索引迁移
//!
//! 为三个事件表创建查询索引：
//! - campaign_id（按活动过滤）
//! - captured_at（时间范围查询）
//! - (campaign_id, captured_at) 复合索引（单活动时间序列）

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // media_logs 索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_media_logs_campaign_id")
                    .table(Alias::new("media_logs"))
                    .col(Alias::new("campaign_id"))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_media_logs_captured_at")
                    .table(Alias::new("media_logs"))
                    .col(Alias::new("captured_at"))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_media_logs_campaign_time")
                    .table(Alias::new("media_logs"))
                    .col(Alias::new("campaign_id"))
                    .col(Alias::new("captured_at"))
                    .to_owned(),
            )
            .await?;

        // gps_logs 索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_gps_logs_campaign_id")
                    .table(Alias::new("gps_logs"))
                    .col(Alias::new("campaign_id"))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_gps_logs_captured_at")
                    .table(Alias::new("gps_logs"))
                    .col(Alias::new("captured_at"))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_gps_logs_campaign_time")
                    .table(Alias::new("gps_logs"))
                    .col(Alias::new("campaign_id"))
                    .col(Alias::new("captured_at"))
                    .to_owned(),
            )
            .await?;

        // social_links 索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_social_links_campaign_id")
                    .table(Alias::new("social_links"))
                    .col(Alias::new("campaign_id"))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_social_links_captured_at")
                    .table(Alias::new("social_links"))
                    .col(Alias::new("captured_at"))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_social_links_campaign_time")
                    .table(Alias::new("social_links"))
                    .col(Alias::new("campaign_id"))
                    .col(Alias::new("captured_at"))
                    .to_owned(),
            )
            .await?;

        // campaigns.created_at 用于 24h 新建活动统计
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_campaigns_created_at")
                    .table(Alias::new("campaigns"))
                    .col(Alias::new("created_at"))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_campaigns_created_at").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_social_links_campaign_time").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_social_links_captured_at").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_social_links_campaign_id").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_gps_logs_campaign_time").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_gps_logs_captured_at").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_gps_logs_campaign_id").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_media_logs_campaign_time").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_media_logs_captured_at").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_media_logs_campaign_id").to_owned())
            .await
    }
}
