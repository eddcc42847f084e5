use serde::Serialize;

// API: https://developer.smartthings.com/docs/api/public#operation/createSchedule
#[derive(Debug, Serialize)]
pub struct ScheduleRequest<'a> {
    pub name: &'a str,
    pub cron: CronSchedule<'a>,
}

#[derive(Debug, Serialize)]
pub struct CronSchedule<'a> {
    pub expression: &'a str,
    pub timezone: &'a str,
}
