pub mod campaign;
pub mod device_log;
pub mod gps_log;
pub mod media_log;
pub mod social_link;

pub use campaign::Entity as CampaignEntity;
pub use device_log::Entity as DeviceLogEntity;
pub use gps_log::Entity as GpsLogEntity;
pub use media_log::Entity as MediaLogEntity;
pub use social_link::Entity as SocialLinkEntity;
