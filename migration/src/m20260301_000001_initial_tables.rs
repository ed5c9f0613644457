//! 初始表迁移
//!
//! 创建活动追踪的核心表：
//! - campaigns：追踪会话（名称、浏览计数）
//! - media_logs：拍摄的照片/视频记录
//! - gps_logs：GPS 坐标记录
//! - social_links：社交平台视频链接记录
//! - device_logs：访问设备/浏览器记录

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 campaigns 表
        manager
            .create_table(
                Table::create()
                    .table(Campaigns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Campaigns::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Campaigns::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Campaigns::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Campaigns::CurrentViews)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 media_logs 表
        manager
            .create_table(
                Table::create()
                    .table(MediaLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MediaLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MediaLogs::CampaignId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MediaLogs::MediaType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(MediaLogs::FilePath).text().not_null())
                    .col(
                        ColumnDef::new(MediaLogs::CapturedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_media_logs_campaign")
                            .from(MediaLogs::Table, MediaLogs::CampaignId)
                            .to(Campaigns::Table, Campaigns::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 gps_logs 表
        manager
            .create_table(
                Table::create()
                    .table(GpsLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GpsLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GpsLogs::CampaignId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GpsLogs::Latitude).double().not_null())
                    .col(ColumnDef::new(GpsLogs::Longitude).double().not_null())
                    .col(
                        ColumnDef::new(GpsLogs::CapturedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_gps_logs_campaign")
                            .from(GpsLogs::Table, GpsLogs::CampaignId)
                            .to(Campaigns::Table, Campaigns::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 social_links 表
        manager
            .create_table(
                Table::create()
                    .table(SocialLinks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SocialLinks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SocialLinks::CampaignId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SocialLinks::Platform)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(SocialLinks::VideoUrl).text().not_null())
                    .col(
                        ColumnDef::new(SocialLinks::CapturedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_social_links_campaign")
                            .from(SocialLinks::Table, SocialLinks::CampaignId)
                            .to(Campaigns::Table, Campaigns::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 device_logs 表
        manager
            .create_table(
                Table::create()
                    .table(DeviceLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeviceLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DeviceLogs::DeviceDetails)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeviceLogs::BrowserDetails)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeviceLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按外键依赖逆序删除
        manager
            .drop_table(Table::drop().table(DeviceLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SocialLinks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GpsLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MediaLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Campaigns::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Campaigns {
    #[sea_orm(iden = "campaigns")]
    Table,
    Id,
    Name,
    CreatedAt,
    CurrentViews,
}

#[derive(DeriveIden)]
enum MediaLogs {
    #[sea_orm(iden = "media_logs")]
    Table,
    Id,
    CampaignId,
    MediaType,
    FilePath,
    CapturedAt,
}

#[derive(DeriveIden)]
enum GpsLogs {
    #[sea_orm(iden = "gps_logs")]
    Table,
    Id,
    CampaignId,
    Latitude,
    Longitude,
    CapturedAt,
}

#[derive(DeriveIden)]
enum SocialLinks {
    #[sea_orm(iden = "social_links")]
    Table,
    Id,
    CampaignId,
    Platform,
    VideoUrl,
    CapturedAt,
}

#[derive(DeriveIden)]
enum DeviceLogs {
    #[sea_orm(iden = "device_logs")]
    Table,
    Id,
    DeviceDetails,
    BrowserDetails,
    CreatedAt,
}
