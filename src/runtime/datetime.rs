use chrono::{Days, Local};
use regex::Captures;

use super::cap_i64;
use crate::context::ExecutionContext;
use crate::value::RuntimeError;

impl ExecutionContext {
    pub(crate) fn current_datetime(&mut self, _caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let now = Local::now();
        self.emit(format!(
            "Current datetime: {}",
            now.format("%Y-%m-%d %H:%M:%S")
        ));
        Ok("print(now())".to_string())
    }

    pub(crate) fn current_time(&mut self, _caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let now = Local::now();
        self.emit(format!("Current time: {}", now.format("%H:%M:%S")));
        Ok("print(time())".to_string())
    }

    pub(crate) fn current_date(&mut self, _caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let today = Local::now().date_naive();
        self.emit(format!("Current date: {}", today.format("%Y-%m-%d")));
        Ok("print(today())".to_string())
    }

    pub(crate) fn add_days_to_today(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let days = cap_i64(caps, 1)? as u64;
        let today = Local::now().date_naive();
        let future = today
            .checked_add_days(Days::new(days))
            .ok_or_else(|| RuntimeError::new("Date out of range"))?;
        self.emit(format!(
            "Date {} days from today: {}",
            days,
            future.format("%Y-%m-%d")
        ));
        Ok(format!("print(today() + {} days)", days))
    }

    pub(crate) fn subtract_days_from_today(
        &mut self,
        caps: &Captures<'_>,
    ) -> Result<String, RuntimeError> {
        let days = cap_i64(caps, 1)? as u64;
        let today = Local::now().date_naive();
        let past = today
            .checked_sub_days(Days::new(days))
            .ok_or_else(|| RuntimeError::new("Date out of range"))?;
        self.emit(format!(
            "Date {} days ago: {}",
            days,
            past.format("%Y-%m-%d")
        ));
        Ok(format!("print(today() - {} days)", days))
    }
}
