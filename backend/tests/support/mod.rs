#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use outbreak_trends::sources::{InMemorySource, SourceKind};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores variables on unwind and serializes access to the process-global
/// environment, since tests run in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

// Column order follows the upstream files: sub-region first, dates unsorted
// only in the deaths table to exercise ordering.
pub const CONFIRMED_CSV: &str = "\
Province/State,Country/Region,Lat,Long,3/1/20,3/2/20,3/3/20,3/4/20,3/5/20
,Italy,41.87,12.56,1694,2036,2502,3089,3858
Hubei,China,30.97,112.27,66907,67103,67217,67332,67466
,Spain,40.46,-3.75,84,120,165,222,259
,Malta,35.94,14.38,0,0,0,0,3
France,France,46.23,2.21,130,191,204,288,380
";

pub const DEATHS_CSV: &str = "\
Province/State,Country/Region,Lat,Long,3/5/20,3/1/20,3/2/20,3/3/20,3/4/20
,Italy,41.87,12.56,148,34,52,79,107
Hubei,China,30.97,112.27,2902,2803,2835,2871,2902
,Spain,40.46,-3.75,3,0,0,1,2
,Malta,35.94,14.38,0,0,0,0,0
France,France,46.23,2.21,6,2,3,4,4
";

// Malta is missing here and must be reported as skipped.
pub const RECOVERED_CSV: &str = "\
Province/State,Country/Region,Lat,Long,3/1/20,3/2/20,3/3/20,3/4/20,3/5/20
,Italy,41.87,12.56,83,149,160,276,414
Hubei,China,30.97,112.27,31536,33934,36208,38557,40592
,Spain,40.46,-3.75,2,2,2,2,2
France,France,46.23,2.21,12,12,12,12,12
";

pub const LOCKDOWN_CSV: &str = "\
Country/Region,Province/State,Date of action,Action type,Reference
Italy,,2020-03-03,Full,https://example.org/it
China,Hubei,2020-03-01,Full,https://example.org/hb
Spain,,,Partial,https://example.org/es
France,France,2020-04-17,Full,https://example.org/fr
";

/// The four fixture tables.
pub fn fixture_source() -> InMemorySource {
    InMemorySource::new()
        .with_table(SourceKind::Confirmed, CONFIRMED_CSV)
        .with_table(SourceKind::Deaths, DEATHS_CSV)
        .with_table(SourceKind::Recovered, RECOVERED_CSV)
        .with_table(SourceKind::Lockdown, LOCKDOWN_CSV)
}
