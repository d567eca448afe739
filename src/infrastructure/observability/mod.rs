//! Observability infrastructure - Metrics

mod counters;

pub use counters::{
    outcome_label, record_deletion, record_profile_update, record_registration, record_search,
    RegistrationPath,
};
