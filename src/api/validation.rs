//! Request bodies and the range checks the engines rely on callers to make

use std::ops::RangeInclusive;
use serde::{Deserialize, Serialize};

use crate::{
    error::ValidationError,
    state::{ExamConfig, ExamConfigUpdate},
};

pub const YEAR_RANGE: RangeInclusive<u8> = 7..=12;
pub const DEFAULT_YEAR: u8 = 11;
pub const WORKING_MINUTES_MIN: u32 = 60;
pub const WORKING_MINUTES_MAX: u32 = 120;
pub const WORKING_MINUTES_STEP: u32 = 5;
pub const PREP_MINUTE_OPTIONS: [u32; 5] = [0, 5, 10, 15, 20];
pub const MAX_DURATION_MINUTES: u32 = 480;
pub const DURATION_PRESETS: [u32; 6] = [15, 30, 45, 60, 90, 120];

/// Body of `POST /exams`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExamRequest {
    #[serde(default = "default_year")]
    pub year: i64,
    pub label: String,
    #[serde(default = "default_working_minutes")]
    pub working_minutes: u32,
    #[serde(default)]
    pub perusal_minutes: u32,
    #[serde(default)]
    pub planning_minutes: u32,
}

impl NewExamRequest {
    pub fn validate(self) -> Result<ExamConfig, ValidationError> {
        Ok(ExamConfig {
            year: clamp_year(self.year),
            label: validate_label(&self.label)?,
            working_minutes: validate_working_minutes(self.working_minutes)?,
            perusal_minutes: validate_prep_minutes("perusal_minutes", self.perusal_minutes)?,
            planning_minutes: validate_prep_minutes("planning_minutes", self.planning_minutes)?,
        })
    }
}

/// Body of `PATCH /exams/:id`; absent fields are left as they are
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExamUpdateRequest {
    pub year: Option<i64>,
    pub label: Option<String>,
    pub working_minutes: Option<u32>,
    pub perusal_minutes: Option<u32>,
    pub planning_minutes: Option<u32>,
}

impl ExamUpdateRequest {
    pub fn validate(self) -> Result<ExamConfigUpdate, ValidationError> {
        Ok(ExamConfigUpdate {
            year: self.year.map(clamp_year),
            label: self.label.as_deref().map(validate_label).transpose()?,
            working_minutes: self.working_minutes.map(validate_working_minutes).transpose()?,
            perusal_minutes: self
                .perusal_minutes
                .map(|m| validate_prep_minutes("perusal_minutes", m))
                .transpose()?,
            planning_minutes: self
                .planning_minutes
                .map(|m| validate_prep_minutes("planning_minutes", m))
                .transpose()?,
        })
    }
}

/// Body of `PUT /countdown/duration`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationRequest {
    pub minutes: u32,
}

impl DurationRequest {
    pub fn validate(&self) -> Result<u32, ValidationError> {
        if self.minutes == 0 || self.minutes > MAX_DURATION_MINUTES {
            return Err(ValidationError::Duration {
                got: self.minutes,
                max: MAX_DURATION_MINUTES,
            });
        }
        Ok(self.minutes)
    }
}

/// Working-time choices offered by the exam form
pub fn working_minute_options() -> Vec<u32> {
    (WORKING_MINUTES_MIN..=WORKING_MINUTES_MAX)
        .step_by(WORKING_MINUTES_STEP as usize)
        .collect()
}

fn default_year() -> i64 {
    i64::from(DEFAULT_YEAR)
}

fn default_working_minutes() -> u32 {
    WORKING_MINUTES_MIN
}

fn clamp_year(year: i64) -> u8 {
    let clamped = year.clamp(i64::from(*YEAR_RANGE.start()), i64::from(*YEAR_RANGE.end()));
    clamped as u8
}

fn validate_label(label: &str) -> Result<String, ValidationError> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyLabel);
    }
    Ok(trimmed.to_string())
}

fn validate_working_minutes(minutes: u32) -> Result<u32, ValidationError> {
    let in_range = (WORKING_MINUTES_MIN..=WORKING_MINUTES_MAX).contains(&minutes);
    if !in_range || (minutes - WORKING_MINUTES_MIN) % WORKING_MINUTES_STEP != 0 {
        return Err(ValidationError::WorkingMinutes {
            got: minutes,
            min: WORKING_MINUTES_MIN,
            max: WORKING_MINUTES_MAX,
            step: WORKING_MINUTES_STEP,
        });
    }
    Ok(minutes)
}

fn validate_prep_minutes(field: &'static str, minutes: u32) -> Result<u32, ValidationError> {
    if !PREP_MINUTE_OPTIONS.contains(&minutes) {
        return Err(ValidationError::PrepMinutes { field, got: minutes });
    }
    Ok(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(label: &str) -> NewExamRequest {
        NewExamRequest {
            year: 11,
            label: label.to_string(),
            working_minutes: 90,
            perusal_minutes: 10,
            planning_minutes: 5,
        }
    }

    #[test]
    fn valid_request_builds_config() {
        let config = request("  Physics - IA1  ").validate().unwrap();
        assert_eq!(config.label, "Physics - IA1");
        assert_eq!(config.year, 11);
        assert_eq!(config.working_minutes, 90);
        assert_eq!(config.total_minutes(), 105);
    }

    #[test]
    fn defaults_follow_the_form() {
        let parsed: NewExamRequest = serde_json::from_str(r#"{"label":"English"}"#).unwrap();
        let config = parsed.validate().unwrap();
        assert_eq!(config.year, DEFAULT_YEAR);
        assert_eq!(config.working_minutes, 60);
        assert_eq!(config.perusal_minutes, 0);
        assert_eq!(config.planning_minutes, 0);
    }

    #[test]
    fn year_is_clamped() {
        let mut low = request("a");
        low.year = 3;
        assert_eq!(low.validate().unwrap().year, 7);

        let mut high = request("a");
        high.year = 99;
        assert_eq!(high.validate().unwrap().year, 12);
    }

    #[test]
    fn blank_label_is_rejected() {
        assert_eq!(request("   ").validate(), Err(ValidationError::EmptyLabel));
    }

    #[test]
    fn working_minutes_bounds_and_step() {
        for bad in [55, 62, 125, 0] {
            let mut req = request("a");
            req.working_minutes = bad;
            assert!(
                matches!(req.validate(), Err(ValidationError::WorkingMinutes { got, .. }) if got == bad),
                "{bad} should be rejected"
            );
        }
        for good in [60, 65, 120] {
            let mut req = request("a");
            req.working_minutes = good;
            assert!(req.validate().is_ok());
        }
    }

    #[test]
    fn prep_minutes_must_be_an_option() {
        let mut req = request("a");
        req.planning_minutes = 7;
        assert_eq!(
            req.validate(),
            Err(ValidationError::PrepMinutes {
                field: "planning_minutes",
                got: 7
            })
        );
    }

    #[test]
    fn update_validates_only_present_fields() {
        let update = ExamUpdateRequest {
            working_minutes: Some(75),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(update.working_minutes, Some(75));
        assert_eq!(update.label, None);

        let bad = ExamUpdateRequest {
            label: Some(" ".to_string()),
            ..Default::default()
        };
        assert_eq!(bad.validate(), Err(ValidationError::EmptyLabel));
    }

    #[test]
    fn duration_bounds() {
        assert!(DurationRequest { minutes: 0 }.validate().is_err());
        assert_eq!(DurationRequest { minutes: 1 }.validate(), Ok(1));
        assert_eq!(DurationRequest { minutes: 480 }.validate(), Ok(480));
        assert!(DurationRequest { minutes: 481 }.validate().is_err());
    }

    #[test]
    fn working_options_cover_the_range() {
        let options = working_minute_options();
        assert_eq!(options.len(), 13);
        assert_eq!(options.first(), Some(&60));
        assert_eq!(options.last(), Some(&120));
    }
}
