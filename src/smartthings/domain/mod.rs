mod device;
mod schedule;

pub use device::{CreateDeviceApp, CreateDeviceRequest, CreateDeviceResponse, DeviceListResponse};
pub use schedule::{CronSchedule, ScheduleRequest};
