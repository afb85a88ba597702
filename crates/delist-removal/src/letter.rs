//! Opt-out letter generation.
//!
//! Produces the removal-request letter a user can send to a broker. Pure
//! string templating over the user profile and the exposure; nothing is
//! persisted.

use chrono::{Datelike, Local, NaiveDate};
use delist_broker::BrokerRecord;
use delist_db::{Exposure, User};

/// Generate the removal-request letter for one exposure, dated today.
#[must_use]
pub fn generate_removal_letter(broker: &BrokerRecord, user: &User, exposure: &Exposure) -> String {
    letter_with_date(broker, user, exposure, Local::now().date_naive())
}

fn letter_with_date(
    broker: &BrokerRecord,
    user: &User,
    exposure: &Exposure,
    date: NaiveDate,
) -> String {
    let full_name = user.full_name();
    let full_address = format!(
        "{}, {}, {} {}",
        user.current_address, user.city, user.state, user.zip_code
    );

    let previous_addresses_line = user
        .previous_addresses
        .as_deref()
        .map(|a| format!("- Previous Addresses: {a}"))
        .unwrap_or_default();

    let profile_url = exposure.profile_url.as_deref().unwrap_or("N/A");
    let exposed_data = exposure.exposed_data.join(", ");

    // Month/day/year without zero padding, matching a US short date.
    let date_line = format!("{}/{}/{}", date.month(), date.day(), date.year());

    format!(
        "Subject: Data Removal Request - {full_name}\n\
         \n\
         Dear {broker_name} Privacy Team,\n\
         \n\
         I am writing to request the immediate removal of my personal information from your database. I have discovered that my information is being displayed on your website without my consent.\n\
         \n\
         Personal Information to be Removed:\n\
         - Full Name: {full_name}\n\
         - Current Address: {full_address}\n\
         - Email: {email}\n\
         - Phone: {phone}\n\
         - Date of Birth: {date_of_birth}\n\
         {previous_addresses_line}\n\
         \n\
         Profile URL (if applicable): {profile_url}\n\
         \n\
         Exposed Data Found: {exposed_data}\n\
         \n\
         I am exercising my rights under applicable privacy laws, including but not limited to CCPA, GDPR, and other state/federal privacy regulations. I request that you:\n\
         \n\
         1. Remove all of my personal information from your public-facing website\n\
         2. Remove my information from your internal databases\n\
         3. Do not sell, share, or distribute my personal information to third parties\n\
         4. Confirm in writing that my information has been removed\n\
         \n\
         Please process this request within the timeframe required by law and confirm removal via email at {email}.\n\
         \n\
         Thank you for your prompt attention to this matter.\n\
         \n\
         Sincerely,\n\
         {full_name}\n\
         {date_line}",
        broker_name = broker.name,
        email = user.email,
        phone = user.phone,
        date_of_birth = user.date_of_birth,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use delist_broker::{BrokerCategory, BrokerPriority};
    use delist_core::BrokerId;

    fn test_user(previous_addresses: Option<&str>) -> User {
        User {
            id: "user-1".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "j@d.com".to_string(),
            phone: "555-0100".to_string(),
            date_of_birth: "1985-06-15".to_string(),
            current_address: "123 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62704".to_string(),
            previous_addresses: previous_addresses.map(ToString::to_string),
            created_at: Utc::now(),
        }
    }

    fn test_broker() -> BrokerRecord {
        BrokerRecord {
            id: BrokerId::new("acme").expect("valid id"),
            name: "Acme".to_string(),
            url: "https://acme.example.com".to_string(),
            category: BrokerCategory::PeopleSearch,
            priority: BrokerPriority::High,
            opt_out_url: None,
            opt_out_process: "Online form".to_string(),
            required_info: vec!["Full Name".to_string()],
            estimated_processing_time: "7 days".to_string(),
            difficulty_rating: 2,
        }
    }

    fn test_exposure(profile_url: Option<&str>) -> Exposure {
        Exposure {
            id: "exposure-1".to_string(),
            scan_id: "scan-1".to_string(),
            broker_id: "acme".to_string(),
            exposed_data: vec!["Full Name".to_string(), "Phone Number".to_string()],
            profile_url: profile_url.map(ToString::to_string),
            discovered_at: Utc::now(),
        }
    }

    #[test]
    fn test_letter_contains_required_lines() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 30).expect("valid date");
        let letter = letter_with_date(&test_broker(), &test_user(None), &test_exposure(None), date);

        assert!(letter.starts_with("Subject: Data Removal Request - John Doe\n"));
        assert!(letter.contains("Dear Acme Privacy Team,"));
        assert!(letter.contains("- Full Name: John Doe"));
        assert!(letter.contains("- Current Address: 123 Main St, Springfield, IL 62704"));
        assert!(letter.contains("Profile URL (if applicable): N/A"));
        assert!(letter.contains("Exposed Data Found: Full Name, Phone Number"));
        assert!(letter.contains("Sincerely,\nJohn Doe"));
        assert!(letter.ends_with("8/30/2026"));
    }

    #[test]
    fn test_previous_addresses_line_is_conditional() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 2).expect("valid date");

        let with = letter_with_date(
            &test_broker(),
            &test_user(Some("456 Oak Ave, Portland, OR")),
            &test_exposure(None),
            date,
        );
        assert!(with.contains("- Previous Addresses: 456 Oak Ave, Portland, OR"));

        let without =
            letter_with_date(&test_broker(), &test_user(None), &test_exposure(None), date);
        assert!(!without.contains("Previous Addresses"));
        assert!(without.ends_with("1/2/2026"));
    }

    #[test]
    fn test_profile_url_is_included_when_present() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 30).expect("valid date");
        let letter = letter_with_date(
            &test_broker(),
            &test_user(None),
            &test_exposure(Some("https://acme.example.com/profile/John-Doe")),
            date,
        );
        assert!(letter.contains(
            "Profile URL (if applicable): https://acme.example.com/profile/John-Doe"
        ));
    }
}
