//! Deterministic scan decision functions.
//!
//! The scan never touches a real broker. Whether a broker "has" the user's
//! data is a pure function of the broker's position in the catalog and its
//! priority, so repeated scans over the same catalog always agree. Keeping
//! these as free functions makes every decision unit-testable without a
//! database or a clock.

use delist_broker::BrokerPriority;

/// Data-type labels an exposure may carry. `required_info` entries outside
/// this set are dropped rather than shown to the user verbatim.
const RECOGNIZED_LABELS: [&str; 19] = [
    "Full Name",
    "Current Address",
    "Phone Number",
    "Age",
    "Email Address",
    "Previous Addresses",
    "Date of Birth",
    "Relatives",
    "Social Profiles",
    "Criminal Records",
    "Associates",
    "Public Records",
    "Address History",
    "Phone Numbers",
    "Contact Info",
    "Reputation Score",
    "Reviews",
    "Photos",
    "Family Members",
];

/// Labels used to top up a short exposure list.
const COMMON_LABELS: [&str; 4] = [
    "Full Name",
    "Current Address",
    "Phone Number",
    "Email Address",
];

/// Maximum number of labels on a single exposure.
const MAX_EXPOSED_LABELS: usize = 6;

fn priority_weight(priority: BrokerPriority) -> u64 {
    match priority {
        BrokerPriority::High => 7,
        BrokerPriority::Medium => 3,
        BrokerPriority::Low => 1,
    }
}

fn find_probability(priority: BrokerPriority) -> f64 {
    match priority {
        BrokerPriority::High => 0.6,
        BrokerPriority::Medium => 0.3,
        BrokerPriority::Low => 0.1,
    }
}

/// Decide whether the broker at 0-based catalog position `index` holds the
/// user's data.
///
/// `seed = (index + 1) * weight`, folded to a pseudo-probability in steps of
/// 0.1, compared against the per-priority find probability.
#[must_use]
pub fn exposure_found(index: usize, priority: BrokerPriority) -> bool {
    let seed = (index as u64 + 1) * priority_weight(priority);
    #[allow(clippy::cast_precision_loss)]
    let pseudo_random = (seed % 10) as f64 / 10.0;
    pseudo_random < find_probability(priority)
}

/// Build the exposed-data label list for a found broker.
///
/// Takes the broker's recognized `required_info` labels first, tops up with
/// the common labels, and caps the list at six entries. The result is never
/// empty.
#[must_use]
pub fn exposed_data(required_info: &[String]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();

    for item in required_info {
        if RECOGNIZED_LABELS.contains(&item.as_str()) && labels.len() < MAX_EXPOSED_LABELS {
            labels.push(item.clone());
        }
    }

    for item in COMMON_LABELS {
        if !labels.iter().any(|l| l == item) && labels.len() < MAX_EXPOSED_LABELS {
            labels.push(item.to_string());
        }
    }

    if labels.is_empty() {
        labels = vec![
            "Full Name".to_string(),
            "Phone Number".to_string(),
            "Address".to_string(),
        ];
    }

    labels
}

/// Compute the privacy score for a finished scan.
///
/// `max(0, round(100 - found/total * 100 * 1.5))`, so exposure on a third of
/// the catalog already pulls the score to 50 and two thirds floors it at 0.
#[must_use]
pub fn privacy_score(exposures_found: usize, total_brokers: usize) -> i64 {
    if total_brokers == 0 {
        return 100;
    }
    #[allow(clippy::cast_precision_loss)]
    let exposure_percentage = (exposures_found as f64 / total_brokers as f64) * 100.0;
    let score = (100.0 - exposure_percentage * 1.5).round();
    #[allow(clippy::cast_possible_truncation)]
    let score = score.max(0.0) as i64;
    score
}
