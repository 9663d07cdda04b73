pub mod mock_line_type_lookup;
pub mod twilio_lookup_client;

pub use mock_line_type_lookup::MockLineTypeLookup;
pub use twilio_lookup_client::TwilioLookupClient;
