#[cfg(test)]
mod tests {
    use crate::availability::{is_available, BUFFER_WINDOW_MINUTES};
    use crate::calendar::time_slots;
    use crate::catalog::{base_catalog, effective_duration};
    use crate::month::Density;
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;
    use salonsync_common::models::{Appointment, Profession, Specialization};
    use std::collections::HashMap;

    fn appointment_at(offset_minutes: i64) -> Appointment {
        let base = Utc.with_ymd_and_hms(2025, 5, 15, 8, 0, 0).unwrap();
        Appointment {
            id: format!("a{}", offset_minutes),
            client_id: "temp".to_string(),
            client_name: None,
            service_id: None,
            start_time: base + Duration::minutes(offset_minutes),
            notes: None,
        }
    }

    proptest! {
        // Start times more than the buffer apart never conflict, whatever the services
        #[test]
        fn test_far_apart_starts_are_bookable(
            existing in 0..600i64,
            gap in (BUFFER_WINDOW_MINUTES + 1)..600i64,
            before in any::<bool>(),
        ) {
            let appointments = vec![appointment_at(existing)];
            let candidate_offset = if before { existing - gap } else { existing + gap };
            let candidate = appointment_at(candidate_offset).start_time;
            prop_assert!(is_available(&appointments, candidate));
        }

        // Anything strictly inside the buffer conflicts
        #[test]
        fn test_close_starts_conflict(
            existing in 0..600i64,
            delta in -(BUFFER_WINDOW_MINUTES - 1)..BUFFER_WINDOW_MINUTES,
        ) {
            let appointments = vec![appointment_at(existing)];
            let candidate = appointment_at(existing + delta).start_time;
            prop_assert!(!is_available(&appointments, candidate));
        }

        #[test]
        fn test_density_buckets(count in 0usize..50) {
            let expected = match count {
                0 => Density::Empty,
                c if c < 4 => Density::Light,
                c if c < 8 => Density::Moderate,
                _ => Density::Busy,
            };
            prop_assert_eq!(Density::from_count(count), expected);
        }

        // Two slots per hour, minus the half hour after closing
        #[test]
        fn test_slot_count(start in 0u32..23, span in 1u32..12) {
            let end = (start + span).min(23);
            prop_assume!(start < end);
            let slots = time_slots(start, end);
            prop_assert_eq!(slots.len() as u32, (end - start) * 2 + 1);
            prop_assert_eq!(slots.last().map(|s| s.minute), Some(0));
        }

        #[test]
        fn test_override_only_when_positive(minutes in 0u32..240) {
            let services = base_catalog(Profession::Hair, Specialization::Women);
            let service = &services[0];
            let mut overrides = HashMap::new();
            overrides.insert(service.id.clone(), minutes);
            let effective = effective_duration(service, &overrides);
            if minutes == 0 {
                prop_assert_eq!(effective, service.duration);
            } else {
                prop_assert_eq!(effective, minutes);
            }
        }
    }
}
