pub mod device_profile;

pub use device_profile::{DeviceProfile, parse_user_agent};
