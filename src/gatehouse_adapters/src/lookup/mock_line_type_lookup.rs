use gatehouse_core::{LineType, LineTypeLookup, PhoneNumber};

/// Lookup that classifies every number the same way. `Unknown` by default,
/// which passes the VoIP gate.
#[derive(Debug, Clone)]
pub struct MockLineTypeLookup {
    line_type: LineType,
}

impl MockLineTypeLookup {
    pub fn new() -> Self {
        Self {
            line_type: LineType::Unknown,
        }
    }

    pub fn classifying_as(line_type: LineType) -> Self {
        Self { line_type }
    }
}

impl Default for MockLineTypeLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LineTypeLookup for MockLineTypeLookup {
    async fn classify(&self, _phone_number: &PhoneNumber) -> Result<LineType, String> {
        Ok(self.line_type)
    }
}
