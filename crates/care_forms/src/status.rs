//! Resident presence derived from absence records.
//!
//! A resident is away while an absence is active (`start <= at < end`).
//! When several absences overlap, the one that started last decides the
//! status. Records whose dates don't parse are ignored.

use chrono::NaiveDateTime;
use serde::Serialize;
use strum::Display;

use crate::dates::parse_date_time;
use crate::domains::absence::{
    AbsenceForm, REASON_HOSPITAL_VISIT, REASON_HOSPITALIZATION, REASON_OVERNIGHT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
pub enum ResidentStatus {
    #[strum(serialize = "在室")]
    Present,
    #[strum(serialize = "外出中")]
    Out,
    #[strum(serialize = "外泊中")]
    Overnight,
    #[strum(serialize = "入院中")]
    Hospitalized,
    #[strum(serialize = "通院中")]
    AtClinic,
}

impl ResidentStatus {
    fn for_reason(reason: &str) -> Self {
        match reason {
            REASON_HOSPITAL_VISIT => ResidentStatus::AtClinic,
            REASON_OVERNIGHT => ResidentStatus::Overnight,
            REASON_HOSPITALIZATION => ResidentStatus::Hospitalized,
            // outing, other and anything unknown
            _ => ResidentStatus::Out,
        }
    }

    pub fn is_away(self) -> bool {
        self != ResidentStatus::Present
    }
}

/// Status of one resident at `at`, given all of their absences.
pub fn derive_status(absences: &[AbsenceForm], at: NaiveDateTime) -> ResidentStatus {
    absences
        .iter()
        .filter_map(|absence| {
            let start = parse_date_time(&absence.start_date_time)?;
            let end = parse_date_time(&absence.end_date_time)?;
            (start <= at && at < end).then_some((start, absence))
        })
        .max_by_key(|(start, _)| *start)
        .map(|(_, absence)| ResidentStatus::for_reason(&absence.reason))
        .unwrap_or(ResidentStatus::Present)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::absence::REASON_OUTING;
    use pretty_assertions::assert_eq;

    fn absence(start: &str, end: &str, reason: &str) -> AbsenceForm {
        AbsenceForm {
            start_date_time: start.into(),
            end_date_time: end.into(),
            reason: reason.into(),
            ..AbsenceForm::default()
        }
    }

    fn at(s: &str) -> NaiveDateTime {
        parse_date_time(s).unwrap()
    }

    #[test]
    fn present_without_active_absence() {
        let absences = [absence("2025-01-25T10:00", "2025-01-25T12:00", REASON_OUTING)];
        assert_eq!(derive_status(&[], at("2025-01-25T11:00")), ResidentStatus::Present);
        assert_eq!(
            derive_status(&absences, at("2025-01-25T09:59")),
            ResidentStatus::Present
        );
        // end is exclusive
        assert_eq!(
            derive_status(&absences, at("2025-01-25T12:00")),
            ResidentStatus::Present
        );
    }

    #[test]
    fn reasons_map_to_statuses() {
        let cases = [
            (REASON_HOSPITAL_VISIT, ResidentStatus::AtClinic),
            (REASON_OUTING, ResidentStatus::Out),
            (REASON_OVERNIGHT, ResidentStatus::Overnight),
            (REASON_HOSPITALIZATION, ResidentStatus::Hospitalized),
            ("other", ResidentStatus::Out),
        ];
        for (reason, expected) in cases {
            let absences = [absence("2025-01-25T10:00", "2025-01-26T10:00", reason)];
            assert_eq!(derive_status(&absences, at("2025-01-25T10:00")), expected);
        }
    }

    #[test]
    fn latest_start_wins_on_overlap() {
        let absences = [
            absence("2025-01-20T09:00", "2025-02-01T09:00", REASON_HOSPITALIZATION),
            absence("2025-01-25T13:00", "2025-01-25T15:00", REASON_HOSPITAL_VISIT),
            absence("garbage", "2025-01-25T16:00", REASON_OUTING),
        ];
        assert_eq!(
            derive_status(&absences, at("2025-01-25T14:00")),
            ResidentStatus::AtClinic
        );
        assert_eq!(
            derive_status(&absences, at("2025-01-25T15:30")),
            ResidentStatus::Hospitalized
        );
    }

    #[test]
    fn labels() {
        assert_eq!(ResidentStatus::Present.to_string(), "在室");
        assert_eq!(ResidentStatus::Overnight.to_string(), "外泊中");
        assert!(ResidentStatus::Out.is_away());
        assert!(!ResidentStatus::Present.is_away());
    }
}
