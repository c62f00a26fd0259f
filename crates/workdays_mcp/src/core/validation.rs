use crate::core::{
    calendar::MIN_YEAR,
    error::WorkdayServerError,
    models::GetWorkdaysRequest,
};

pub trait Validate {
    fn validate(&self) -> Result<(), WorkdayServerError>;
}

impl Validate for GetWorkdaysRequest {
    fn validate(&self) -> Result<(), WorkdayServerError> {
        if let Some(year) = self.year() {
            if *year < MIN_YEAR {
                return Err(WorkdayServerError::InvalidParams {
                    message: format!("year must be {} or later, got {}", MIN_YEAR, year),
                });
            }
        }

        if let Some(month) = self.month() {
            if !(1..=12).contains(month) {
                return Err(WorkdayServerError::InvalidParams {
                    message: format!("month must be between 1 and 12, got {}", month),
                });
            }
        }

        if let Some(timeout) = self.timeout() {
            if !timeout.is_finite() || *timeout <= 0.0 {
                return Err(WorkdayServerError::InvalidParams {
                    message: format!("timeout must be a positive number of seconds, got {}", timeout),
                });
            }
        }

        Ok(())
    }
}
